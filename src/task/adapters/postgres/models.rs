//! Diesel row models for task persistence.

use super::schema::{tasks, tasks_labels};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub opened: i64,
    pub closed: Option<i64>,
    pub author_id: Option<i64>,
    pub assigned_id: Option<i64>,
    pub title: String,
    pub content: String,
}

/// Insert model for task records.
///
/// Author and assignee are omitted so the column defaults apply.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    pub opened: i64,
    pub title: &'a str,
    pub content: &'a str,
}

/// Changeset for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset<'a> {
    pub author_id: Option<i64>,
    pub assigned_id: Option<i64>,
    pub title: &'a str,
    pub content: &'a str,
}

/// Insert model for task-label associations.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = tasks_labels)]
pub struct TaskLabelRow {
    pub task_id: i64,
    pub label_id: i64,
}
