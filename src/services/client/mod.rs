//! 인증 HTTP 클라이언트 모듈
//!
//! - [`api_client`] - bearer 부착, 401 갱신 후 1회 재시도, 자격 증명 영구화
//! - [`single_flight`] - 동시 401 요청이 공유하는 단일 갱신 작업 슬롯
//! - [`request_status`] - 로딩 카운터와 마지막 에러
//! - [`request_options`] - 요청 단위 헤더/쿼리/타임아웃

pub mod api_client;
pub mod request_options;
pub mod request_status;
pub mod single_flight;

pub use api_client::ApiClient;
pub use request_options::RequestOptions;
pub use request_status::{LoadingGuard, RequestStatus};
pub use single_flight::SingleFlight;
