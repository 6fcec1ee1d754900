//! 求职平台核心领域模型
//!
//! 包含用户、职位、培训课程、职位申请等核心实体，以及相关的业务规则。

pub mod entities;
pub mod errors;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
