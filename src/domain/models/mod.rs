// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 排队条目（queue_entry）：一次排队准入记录及其状态机
/// - 商家（business）：商家目录条目及队列容量投影
/// - 用户（user）：消费端账户
/// - 评价（review）：用户对商家的评价
/// - 订阅（subscription）：订阅计划、通行证与支付记账
pub mod business;
pub mod queue_entry;
pub mod review;
pub mod subscription;
pub mod user;

/// 领域错误类型
///
/// 表示在领域层可能发生的各种错误情况。
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当条目状态转换不符合业务规则时发生
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}
