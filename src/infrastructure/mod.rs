pub mod connectivity;
pub mod gateway;
pub mod notifications;
pub mod storage;
