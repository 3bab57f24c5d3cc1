//! Batch Queries - 批量试听状态

/// 获取批量试听状态查询
#[derive(Debug, Clone, Default)]
pub struct GetBatchStatus;
