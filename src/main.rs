//! 메디스코프 클라이언트 CLI 애플리케이션
//!
//! 환경 설정과 로깅을 초기화한 뒤 명령줄 인자에 따라 로그인, 회원가입,
//! 세션 조회, 인증 요청, 로그아웃을 수행합니다.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // 환경 설정 및 로깅 초기화
    init_logging();
    load_env_file();

    let cli = Cli::parse();

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ 명령 실행 실패: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// # Examples
///
/// ```bash
/// # 개발 환경 (로컬 백엔드)
/// PROFILE=dev mediscope whoami
///
/// # 운영 환경
/// PROFILE=prod mediscope login --email a@b.com
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => info!(".env.dev 파일 없음, 환경 변수만 사용: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// `.env` 파일의 RUST_LOG는 반영되지 않으므로 셸에서 지정합니다.
/// 기본값은 경고 이상이며, CLI 출력이 로그에 묻히지 않도록 합니다.
///
/// ```bash
/// # 토큰 갱신 흐름까지 확인
/// RUST_LOG=mediscope_client=debug mediscope get /notes/
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
}
