// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 排队台账（queue_ledger）：队列准入、位置维护与等待估算
/// - 认证服务（auth_service）：密码哈希与 JWT 令牌签发验证
pub mod auth_service;
pub mod queue_ledger;
