// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250301_000002_create_tasks::Tasks;

/// 为周期任务扫描创建索引
///
/// 调度器每分钟按 `recurrence_rule` 与 `next_trigger` 查询到期任务
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_recurrence_due")
                    .table(Tasks::Table)
                    .col(Tasks::RecurrenceRule)
                    .col(Tasks::NextTrigger)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tasks_recurrence_due")
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await
    }
}
