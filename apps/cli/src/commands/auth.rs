//! `stockbook login | logout | whoami`

use serde::Serialize;
use serde_json::Value;
use stockbook_store::{EntityStore, SnapshotBackend};

use super::to_output;
use crate::error::{CliError, CliResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoggedOut {
    logged_out: bool,
}

pub fn login<B: SnapshotBackend>(
    store: &mut EntityStore<B>,
    username: &str,
    password: &str,
) -> CliResult<Value> {
    if !store.login(username, password)? {
        return Err(CliError::unauthorized("Invalid username or password"));
    }
    whoami(store)
}

pub fn logout<B: SnapshotBackend>(store: &mut EntityStore<B>) -> CliResult<Value> {
    store.logout()?;
    to_output(&LoggedOut { logged_out: true })
}

pub fn whoami<B: SnapshotBackend>(store: &EntityStore<B>) -> CliResult<Value> {
    let user = store
        .current_user()
        .ok_or_else(|| CliError::unauthorized("Not logged in"))?;
    to_output(user)
}
