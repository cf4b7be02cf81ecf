//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-generated task identifier.
        id -> Int8,
        /// Opening time in epoch seconds.
        opened -> Int8,
        /// Closing time in epoch seconds, `NULL` while open.
        closed -> Nullable<Int8>,
        /// Author user identifier.
        author_id -> Nullable<Int8>,
        /// Assignee user identifier.
        assigned_id -> Nullable<Int8>,
        /// Task title.
        title -> Text,
        /// Free-text task body.
        content -> Text,
    }
}

diesel::table! {
    /// Many-to-many association between tasks and labels.
    tasks_labels (task_id, label_id) {
        /// Associated task.
        task_id -> Int8,
        /// Associated label.
        label_id -> Int8,
    }
}

diesel::joinable!(tasks_labels -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, tasks_labels);
