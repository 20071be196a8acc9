// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// SeaORM 实体定义，每个表一个模型。状态列以字符串存储，
/// 读取路径上解析为领域层的标签枚举。
pub mod business;
pub mod pass_usage;
pub mod payment;
pub mod queue_entry;
pub mod referral;
pub mod review;
pub mod subscription;
pub mod user;
pub mod user_pass;
