//! Given steps for task storage BDD scenarios.

use super::world::{TaskWorld, label_id, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskstore::task::domain::TaskDraft;

#[given("an empty task store")]
fn empty_task_store(world: &mut TaskWorld) {
    *world = TaskWorld::new();
}

#[given(r#"a task titled "{title}" labelled {label:u64}"#)]
fn labelled_task(world: &mut TaskWorld, title: String, label: u64) -> Result<(), eyre::Report> {
    let label = label_id(label)?;
    let id = run_async(world.store.create_task(TaskDraft::new(title, "")))
        .wrap_err("create labelled task")?;
    run_async(world.store.attach_label(id, label)).wrap_err("attach label")?;
    Ok(())
}

#[given(r#"a task titled "{title}" without labels"#)]
fn unlabelled_task(world: &mut TaskWorld, title: String) -> Result<(), eyre::Report> {
    run_async(world.store.create_task(TaskDraft::new(title, "")))
        .wrap_err("create unlabelled task")?;
    Ok(())
}
