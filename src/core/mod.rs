//! 核心模块：配置、错误、响应与中间件

pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
