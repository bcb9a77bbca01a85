//! Backend worker: a dedicated thread running a tokio runtime that
//! drains the UI command queue, performs the HTTP calls and platform
//! side effects, and replies with UI events.
//!
//! Commands are processed one at a time. The workflow state machines
//! already guarantee at most one in-flight call per modal, so there
//! is nothing to gain from concurrency here, and sequential handling
//! keeps reply ordering trivial.

use std::thread;

use client_core::{AccessRequestApi, ApiClient, CredentialApi, Platform};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::UiEvent,
    platform::NativePlatform,
    settings::Settings,
};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "failed to start the backend worker: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let client = match ApiClient::new(settings.server_url.as_str()) {
                Ok(client) => client,
                Err(err) => {
                    error!("rejected server URL '{}': {err}", settings.server_url);
                    let _ = ui_tx.try_send(UiEvent::BackendFailed(err.to_string()));
                    return;
                }
            };
            let platform = NativePlatform;
            let _ = ui_tx.try_send(UiEvent::BackendReady);

            while let Ok(cmd) = cmd_rx.recv() {
                let event = handle_command(&client, &platform, cmd).await;
                debug!(event = event.name(), "backend->ui event");
                let _ = ui_tx.try_send(event);
            }
        });
    });
}

async fn handle_command(
    client: &ApiClient,
    platform: &NativePlatform,
    cmd: BackendCommand,
) -> UiEvent {
    match cmd {
        BackendCommand::LoadGroups { modal } => UiEvent::GroupsLoaded {
            modal,
            outcome: client.fetch_groups().await,
        },
        BackendCommand::SubmitRequest { modal, request } => UiEvent::RequestSettled {
            modal,
            outcome: client.submit_request(&request).await,
        },
        BackendCommand::LoadCredentialStatus { modal } => UiEvent::CredentialStatusLoaded {
            modal,
            outcome: client.fetch_status().await,
        },
        BackendCommand::DownloadConfig { modal } => {
            let outcome = match client.fetch_config().await {
                Ok(contents) => platform
                    .save_credential_config(&contents)
                    .map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            UiEvent::ConfigSaved { modal, outcome }
        }
        BackendCommand::CopyConfig { modal } => {
            let outcome = match client.fetch_config().await {
                Ok(contents) => platform
                    .write_clipboard_text(&contents)
                    .map_err(|err| err.to_string()),
                Err(err) => Err(err.to_string()),
            };
            UiEvent::ConfigCopied { modal, outcome }
        }
    }
}
