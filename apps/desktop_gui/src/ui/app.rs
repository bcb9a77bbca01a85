//! The eframe application: toolbar triggers, the generic modal frame,
//! and the two workflow views.
//!
//! All business state lives in the `client_core` state machines held
//! by the open modal; this layer renders them, forwards guarded
//! transitions to the backend worker, and routes settled replies back
//! by modal token. Replies whose token is not the open modal's are
//! stale by definition and get dropped.

use std::time::{Duration, Instant};

use client_core::{AccessRequestForm, CredentialExportPanel, RequestPhase, StatusPhase};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Align2, Color32};
use shared::protocol::Permission;
use tracing::debug;

use crate::{
    backend_bridge::commands::{BackendCommand, ModalToken},
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
};

enum ModalBody {
    AccessRequest(AccessRequestForm),
    CredentialExport(CredentialExportPanel),
}

struct ActiveModal {
    token: ModalToken,
    body: ModalBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalAction {
    Close,
    RetryLoad,
    Submit,
    Download,
    Copy,
}

pub struct AccessDeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    backend_ready: bool,
    modal: Option<ActiveModal>,
    next_modal_token: ModalToken,
}

impl AccessDeskApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            status: "Starting backend worker...".to_string(),
            backend_ready: false,
            modal: None,
            next_modal_token: 0,
        }
    }

    fn allocate_modal_token(&mut self) -> ModalToken {
        self.next_modal_token += 1;
        self.next_modal_token
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn open_access_request(&mut self) {
        if !self.backend_ready || self.modal.is_some() {
            return;
        }
        let token = self.allocate_modal_token();
        self.modal = Some(ActiveModal {
            token,
            body: ModalBody::AccessRequest(AccessRequestForm::new()),
        });
        self.dispatch(BackendCommand::LoadGroups { modal: token });
    }

    fn open_credential_export(&mut self) {
        if !self.backend_ready || self.modal.is_some() {
            return;
        }
        let token = self.allocate_modal_token();
        self.modal = Some(ActiveModal {
            token,
            body: ModalBody::CredentialExport(CredentialExportPanel::new()),
        });
        self.dispatch(BackendCommand::LoadCredentialStatus { modal: token });
    }

    fn modal_body_mut(&mut self, token: ModalToken) -> Option<&mut ModalBody> {
        match &mut self.modal {
            Some(active) if active.token == token => Some(&mut active.body),
            _ => None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        if let Some(token) = event.modal() {
            let current = self.modal.as_ref().map(|active| active.token);
            if current != Some(token) {
                // The dialog this call belonged to is gone; the settle
                // is applied nowhere.
                debug!(
                    event = event.name(),
                    token,
                    current = ?current,
                    "dropping reply for a closed dialog"
                );
                return;
            }
        }

        match event {
            UiEvent::BackendReady => {
                self.backend_ready = true;
                self.status = "Ready".to_string();
            }
            UiEvent::BackendFailed(message) => {
                self.backend_ready = false;
                self.status = message;
            }
            UiEvent::GroupsLoaded { modal, outcome } => {
                if let Some(ModalBody::AccessRequest(form)) = self.modal_body_mut(modal) {
                    form.apply_load(outcome);
                }
            }
            UiEvent::RequestSettled { modal, outcome } => {
                if let Some(ModalBody::AccessRequest(form)) = self.modal_body_mut(modal) {
                    form.apply_submit(outcome);
                }
            }
            UiEvent::CredentialStatusLoaded { modal, outcome } => {
                if let Some(ModalBody::CredentialExport(panel)) = self.modal_body_mut(modal) {
                    panel.apply_load(outcome);
                }
            }
            UiEvent::ConfigSaved { modal, outcome } => {
                if let Ok(path) = &outcome {
                    self.status = format!("Saved credential config to {}", path.display());
                }
                if let Some(ModalBody::CredentialExport(panel)) = self.modal_body_mut(modal) {
                    panel.apply_download(outcome);
                }
            }
            UiEvent::ConfigCopied { modal, outcome } => {
                if let Some(ModalBody::CredentialExport(panel)) = self.modal_body_mut(modal) {
                    panel.apply_copy(outcome, Instant::now());
                }
            }
        }
    }

    fn apply_action(&mut self, action: ModalAction) {
        if action == ModalAction::Close {
            self.modal = None;
            return;
        }
        let command = {
            let Some(active) = self.modal.as_mut() else {
                return;
            };
            let token = active.token;
            match (action, &mut active.body) {
                (ModalAction::RetryLoad, ModalBody::AccessRequest(form)) => form
                    .begin_load()
                    .then_some(BackendCommand::LoadGroups { modal: token }),
                (ModalAction::RetryLoad, ModalBody::CredentialExport(panel)) => panel
                    .begin_load()
                    .then_some(BackendCommand::LoadCredentialStatus { modal: token }),
                (ModalAction::Submit, ModalBody::AccessRequest(form)) => {
                    form.begin_submit().map(|request| BackendCommand::SubmitRequest {
                        modal: token,
                        request,
                    })
                }
                (ModalAction::Download, ModalBody::CredentialExport(panel)) => panel
                    .begin_download()
                    .then_some(BackendCommand::DownloadConfig { modal: token }),
                (ModalAction::Copy, ModalBody::CredentialExport(panel)) => panel
                    .begin_copy()
                    .then_some(BackendCommand::CopyConfig { modal: token }),
                _ => None,
            }
        };
        if let Some(command) = command {
            self.dispatch(command);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let open_request = ctx.input_mut(|input| {
            input.consume_key(egui::Modifiers::CTRL | egui::Modifiers::SHIFT, egui::Key::A)
        });
        if open_request {
            self.open_access_request();
        }
        let open_export = ctx.input_mut(|input| {
            input.consume_key(egui::Modifiers::CTRL | egui::Modifiers::SHIFT, egui::Key::E)
        });
        if open_export {
            self.open_credential_export();
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Tenant Access Desk");
                ui.separator();
                let enabled = self.backend_ready && self.modal.is_none();
                if ui
                    .add_enabled(enabled, egui::Button::new("Request tenant access..."))
                    .on_hover_text("Ctrl+Shift+A")
                    .clicked()
                {
                    self.open_access_request();
                }
                if ui
                    .add_enabled(enabled, egui::Button::new("Export credentials..."))
                    .on_hover_text("Ctrl+Shift+E")
                    .clicked()
                {
                    self.open_credential_export();
                }
            });
        });
        egui::TopBottomPanel::bottom("status-bar").show(ctx, |ui| {
            ui.label(&self.status);
        });
    }

    fn show_workspace(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(12.0);
            ui.label("Request access to a data tenant group, or export the credential");
            ui.label("config for use on this machine. Both actions talk to the hub's");
            ui.label("access-request service configured at startup.");
        });
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        let mut action: Option<ModalAction> = None;
        let mut open = true;
        {
            let Some(active) = self.modal.as_mut() else {
                return;
            };
            let title = match &active.body {
                ModalBody::AccessRequest(_) => "Request tenant access",
                ModalBody::CredentialExport(_) => "Export credentials",
            };

            let screen_rect = ctx.screen_rect();
            let backdrop = egui::Area::new(egui::Id::new("modal-backdrop"))
                .order(egui::Order::Middle)
                .fixed_pos(screen_rect.min)
                .show(ctx, |ui| {
                    ui.painter()
                        .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(120));
                    // Clicks on the dimmed area close; the window
                    // below consumes its own clicks.
                    ui.allocate_rect(screen_rect, egui::Sense::click())
                });
            if backdrop.inner.clicked() {
                action = Some(ModalAction::Close);
            }

            egui::Window::new(title)
                .order(egui::Order::Foreground)
                .collapsible(false)
                .resizable(false)
                .default_width(380.0)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .open(&mut open)
                .show(ctx, |ui| {
                    let body_action = match &mut active.body {
                        ModalBody::AccessRequest(form) => render_access_request(ui, form),
                        ModalBody::CredentialExport(panel) => {
                            render_credential_export(ui, panel, Instant::now())
                        }
                    };
                    action = body_action.or(action);
                });
        }
        if !open {
            action = Some(ModalAction::Close);
        }
        if let Some(action) = action {
            self.apply_action(action);
        }
    }
}

impl eframe::App for AccessDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_shortcuts(ctx);
        self.show_toolbar(ctx);
        self.show_workspace(ctx);
        if self.modal.is_some() {
            self.show_modal(ctx);
        }
        // Keep ticking so queued replies and the transient "copied"
        // acknowledgment render without user input.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn error_label(ui: &mut egui::Ui, message: &str) {
    ui.colored_label(Color32::from_rgb(220, 80, 80), message);
}

fn render_access_request(ui: &mut egui::Ui, form: &mut AccessRequestForm) -> Option<ModalAction> {
    let mut action = None;
    match form.phase() {
        RequestPhase::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading groups...");
            });
        }
        RequestPhase::LoadFailed => {
            if let Some(error) = form.error() {
                error_label(ui, error);
            }
            if ui.button("Retry").clicked() {
                action = Some(ModalAction::RetryLoad);
            }
        }
        RequestPhase::Ready | RequestPhase::Submitting => {
            if let Some(error) = form.error() {
                error_label(ui, error);
            }
            if !form.my_groups().is_empty() {
                ui.label(format!("Already a member of: {}", form.my_groups().join(", ")));
            }

            let groups = form.available_groups().to_vec();
            let selected_text = if form.selected_group.is_empty() {
                "(no groups available)".to_string()
            } else {
                form.selected_group.clone()
            };
            egui::ComboBox::from_label("Group")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for group in groups {
                        ui.selectable_value(&mut form.selected_group, group.clone(), group.clone());
                    }
                });

            ui.horizontal(|ui| {
                ui.label("Permission:");
                ui.radio_value(
                    &mut form.permission,
                    Permission::ReadOnly,
                    Permission::ReadOnly.label(),
                );
                ui.radio_value(
                    &mut form.permission,
                    Permission::ReadWrite,
                    Permission::ReadWrite.label(),
                );
            });

            ui.add(
                egui::TextEdit::multiline(&mut form.justification)
                    .hint_text("Justification (optional)")
                    .desired_rows(3),
            );

            let submit_label = if form.phase() == RequestPhase::Submitting {
                "Submitting..."
            } else {
                "Submit request"
            };
            if ui
                .add_enabled(form.can_submit(), egui::Button::new(submit_label))
                .clicked()
            {
                action = Some(ModalAction::Submit);
            }
        }
        RequestPhase::Succeeded => {
            if let Some(result) = form.result() {
                ui.label(&result.message);
                ui.label(format!(
                    "{} access to '{}' requested.",
                    result.permission, result.tenant_name
                ));
            }
            if ui.button("Close").clicked() {
                action = Some(ModalAction::Close);
            }
        }
    }
    action
}

fn render_credential_export(
    ui: &mut egui::Ui,
    panel: &CredentialExportPanel,
    now: Instant,
) -> Option<ModalAction> {
    let mut action = None;
    match panel.phase() {
        StatusPhase::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading credential status...");
            });
        }
        StatusPhase::LoadFailed => {
            if let Some(error) = panel.load_error() {
                error_label(ui, error);
            }
            if ui.button("Retry").clicked() {
                action = Some(ModalAction::RetryLoad);
            }
        }
        StatusPhase::Ready => {
            if let Some(status) = panel.status() {
                ui.label(format!("User: {}", status.username));
                ui.label(format!("Hub: {}", status.hub_url));
                if status.local_mode == Some(true) {
                    ui.label("Local mode: credential checks are bypassed.");
                }
                if !panel.is_ready() {
                    error_label(
                        ui,
                        &format!(
                            "Credentials are not ready (missing: {}). Sign in to the hub and retry.",
                            status.missing_cookies.join(", ")
                        ),
                    );
                }
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let download_label = if panel.is_download_in_flight() {
                    "Saving...".to_string()
                } else {
                    format!("Download {}", shared::protocol::CONFIG_FILE_NAME)
                };
                if ui
                    .add_enabled(panel.can_download(), egui::Button::new(download_label))
                    .clicked()
                {
                    action = Some(ModalAction::Download);
                }

                let copy_label = if panel.show_copied(now) {
                    "Copied"
                } else if panel.is_copy_in_flight() {
                    "Copying..."
                } else {
                    "Copy to clipboard"
                };
                if ui
                    .add_enabled(panel.can_copy(), egui::Button::new(copy_label))
                    .clicked()
                {
                    action = Some(ModalAction::Copy);
                }
            });

            if let Some(path) = panel.saved_to() {
                ui.label(format!("Saved to {}", path.display()));
            }
            if let Some(error) = panel.download_error() {
                error_label(ui, error);
            }
            if let Some(error) = panel.copy_error() {
                error_label(ui, error);
            }
        }
    }
    action
}
