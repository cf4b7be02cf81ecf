//! Then steps for task storage BDD scenarios.

use super::world::{TaskWorld, task_id, user_id};
use rstest_bdd_macros::then;

#[then("the store returns task id {id:u64}")]
fn store_returns_id(world: &TaskWorld, id: u64) -> Result<(), eyre::Report> {
    let expected = task_id(id)?;
    let returned = world
        .last_returned_id
        .ok_or_else(|| eyre::eyre!("no task id recorded in scenario world"))?;
    eyre::ensure!(
        returned == expected,
        "expected task id {expected}, got {returned}"
    );
    Ok(())
}

#[then(r#"one task titled "{title}" with content "{content}" is listed"#)]
fn one_task_listed(world: &TaskWorld, title: String, content: String) -> Result<(), eyre::Report> {
    let [task] = world.listing()? else {
        return Err(eyre::eyre!(
            "expected one listed task, found {}",
            world.listing()?.len()
        ));
    };
    eyre::ensure!(task.title() == title, "title mismatch: {}", task.title());
    eyre::ensure!(
        task.content() == content,
        "content mismatch: {}",
        task.content()
    );
    Ok(())
}

#[then("the listed task has no author or assignee")]
fn listed_task_unassigned(world: &TaskWorld) -> Result<(), eyre::Report> {
    let [task] = world.listing()? else {
        return Err(eyre::eyre!("expected exactly one listed task"));
    };
    eyre::ensure!(task.author_id().is_none(), "unexpected author");
    eyre::ensure!(task.assigned_id().is_none(), "unexpected assignee");
    Ok(())
}

#[then("the listed task has author {author:u64} and assignee {assignee:u64}")]
fn listed_task_assigned(world: &TaskWorld, author: u64, assignee: u64) -> Result<(), eyre::Report> {
    let [task] = world.listing()? else {
        return Err(eyre::eyre!("expected exactly one listed task"));
    };
    eyre::ensure!(task.author_id() == Some(user_id(author)?), "author mismatch");
    eyre::ensure!(
        task.assigned_id() == Some(user_id(assignee)?),
        "assignee mismatch"
    );
    Ok(())
}

#[then("no tasks are listed")]
fn no_tasks_listed(world: &TaskWorld) -> Result<(), eyre::Report> {
    let listing = world.listing()?;
    eyre::ensure!(
        listing.is_empty(),
        "expected no tasks, found {}",
        listing.len()
    );
    Ok(())
}

#[then(r#"only the task titled "{title}" is listed"#)]
fn only_task_listed(world: &TaskWorld, title: String) -> Result<(), eyre::Report> {
    let titles: Vec<&str> = world.listing()?.iter().map(|task| task.title()).collect();
    eyre::ensure!(
        titles == vec![title.as_str()],
        "unexpected listing: {titles:?}"
    );
    Ok(())
}

#[then("the listing contains {count:u64} tasks")]
fn listing_contains(world: &TaskWorld, count: u64) -> Result<(), eyre::Report> {
    let listed = u64::try_from(world.listing()?.len())?;
    eyre::ensure!(listed == count, "expected {count} tasks, found {listed}");
    Ok(())
}
