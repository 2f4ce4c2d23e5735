//! 터미널 출력 포맷팅 유틸리티
//!
//! CLI가 세션 상태와 응답을 보여줄 때 사용하는 출력 함수들을 제공합니다.
//! 박스 형태의 제목, 트리 형태의 항목, 세션 요약 등을 시각적으로 표현합니다.

use serde_json::Value;

use crate::routes::AppRoute;
use crate::services::session::{SessionPhase, SessionSnapshot};

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// Unicode 박스 문자를 사용하며 텍스트는 중앙 정렬됩니다.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                  Mediscope Session               ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

/// 하위 항목을 트리 형태로 출력합니다
///
/// ```text
///    ├─ Role: Doctor
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 세션 요약 줄 목록
///
/// 로그인 상태면 사용자/역할/이동 화면을, 아니면 상태만 담습니다.
pub fn session_summary_lines(snapshot: &SessionSnapshot) -> Vec<(String, String)> {
    let phase = match snapshot.phase {
        SessionPhase::Anonymous => "🔓 Anonymous",
        SessionPhase::Authenticating => "⏳ Authenticating",
        SessionPhase::Authenticated => "🔐 Authenticated",
    };
    let mut lines = vec![("Status".to_string(), phase.to_string())];

    if let Some(user) = &snapshot.user {
        lines.push(("User".to_string(), format!("{} <{}>", user.display_name(), user.email)));
        lines.push(("Role".to_string(), user.role.to_string()));
        lines.push(("Home".to_string(), AppRoute::home_for(user.role).path().to_string()));
    }
    if snapshot.flags.is_authenticated && snapshot.user.is_none() {
        lines.push(("Credentials".to_string(), "present (no cached user)".to_string()));
    }
    if let Some(error) = &snapshot.last_error {
        lines.push(("Last error".to_string(), error.clone()));
    }

    lines
}

/// 세션 요약을 출력합니다
pub fn print_session_summary(snapshot: &SessionSnapshot) {
    println!();
    print_boxed_title("🩺 MEDISCOPE SESSION");
    for (name, value) in session_summary_lines(snapshot) {
        print_sub_task(&name, &value);
    }
    println!();
}

/// 응답 본문을 들여쓴 JSON으로 출력합니다
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{}", rendered),
        Err(_) => println!("{}", value),
    }
}
