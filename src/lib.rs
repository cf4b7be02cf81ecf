//! Taskstore: data-access layer for a task tracker.
//!
//! This crate stores task records (issue-like entities with an author, an
//! assignee, a title, free-text content and open/close timestamps) in
//! `PostgreSQL`, and lists them by identifier, author or label.
//!
//! # Architecture
//!
//! Taskstore follows hexagonal architecture principles:
//!
//! - **Domain**: Task records, identifiers and filters with no
//!   infrastructure dependencies
//! - **Ports**: The [`task::ports::TaskRepository`] trait
//! - **Adapters**: `PostgreSQL` (Diesel with an r2d2 pool) and in-memory
//!   implementations of the port
//!
//! # Modules
//!
//! - [`config`]: Connection settings loaded from the environment
//! - [`task`]: Task records, repositories and the task store service

pub mod config;
pub mod task;
