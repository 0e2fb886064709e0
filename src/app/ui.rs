use super::{ResumeMatcherApp, View, ViewKind, WorkspaceState};
use crate::errors::ClientError;
use crate::results::{MatchResult, ResultSet, EXPORT_FILE_NAME};
use crate::upload::SelectedFile;
use crate::utils::file_size::{describe_batch, format_size};
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use tracing::{error, warn};

const ACCENT: Color32 = Color32::from_rgb(29, 78, 216);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 160, 0);

enum PageAction {
    Previous,
    Next,
    GoTo(usize),
}

impl ResumeMatcherApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                match self.router.kind() {
                    ViewKind::Landing => self.render_landing(ui),
                    ViewKind::Login => self.render_login(ui),
                    ViewKind::Workspace => self.render_workspace(ui),
                }
                ui.add_space(20.0);
            });
        });
    }

    fn render_landing(&mut self, ui: &mut egui::Ui) {
        let View::Landing(landing) = self.router.view() else {
            return;
        };

        let mut get_started = false;
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new("Welcome to Resume Matcher").color(ACCENT).size(28.0));
            ui.add_space(10.0);
            ui.label(
                RichText::new(
                    "Resume Matcher helps you match resumes with job descriptions efficiently.",
                )
                .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
            ui.add_space(30.0);

            let button = egui::Button::new("Get started").min_size(egui::vec2(160.0, 36.0));
            get_started = ui.add(button).clicked();

            ui.add_space(20.0);
            match &landing.service_status {
                None => {
                    ui.label("Checking matching service...");
                }
                Some(Ok(message)) => {
                    ui.colored_label(SUCCESS_GREEN, format!("Service online: {message}"));
                }
                Some(Err(e)) => {
                    ui.colored_label(ERROR_RED, e);
                }
            }
        });

        if get_started {
            self.router.get_started();
        }
    }

    fn render_login(&mut self, ui: &mut egui::Ui) {
        let api = self.router.api();
        let View::Login(form) = self.router.view_mut() else {
            return;
        };

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Login");
            ui.add_space(10.0);

            if let Some(error) = &form.error {
                ui.colored_label(ERROR_RED, error);
                ui.add_space(5.0);
            }

            ui.add(
                egui::TextEdit::singleline(&mut form.username)
                    .hint_text("Username")
                    .desired_width(240.0),
            );
            let password = ui.add(
                egui::TextEdit::singleline(&mut form.password)
                    .password(true)
                    .hint_text("Password")
                    .desired_width(240.0),
            );
            let pressed_enter =
                password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(10.0);
            let can_submit = !form.is_pending()
                && !form.username.trim().is_empty()
                && !form.password.is_empty();
            let label = if form.is_pending() { "Logging in..." } else { "Login" };
            let clicked = ui
                .add_enabled(
                    can_submit,
                    egui::Button::new(label).min_size(egui::vec2(240.0, 32.0)),
                )
                .clicked();

            if clicked || (pressed_enter && can_submit) {
                form.submit(api);
            }
        });
    }

    fn render_workspace(&mut self, ui: &mut egui::Ui) {
        let mut logout = false;
        let mut submit = false;

        {
            let View::Workspace(workspace) = self.router.view_mut() else {
                return;
            };

            ui.horizontal(|ui| {
                ui.heading(RichText::new("Resume Matcher").color(ACCENT));
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    logout = ui.button("Logout").clicked();
                });
            });
            ui.add_space(20.0);

            render_file_selection(ui, workspace);
            ui.add_space(20.0);

            if workspace.is_uploading() {
                let progress = workspace.progress() as f32 / 100.0;
                ui.add(
                    egui::ProgressBar::new(progress)
                        .show_percentage()
                        .fill(ACCENT),
                );
                ui.add_space(10.0);
            }

            ui.vertical_centered(|ui| {
                let label = if workspace.is_uploading() {
                    "Processing..."
                } else {
                    "Upload and Match"
                };
                let button = egui::Button::new(label).min_size(egui::vec2(200.0, 40.0));
                submit = ui.add_enabled(!workspace.is_uploading(), button).clicked();
            });

            if let Some(error) = &workspace.error_message {
                ui.add_space(5.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(ERROR_RED, error);
                });
            } else if let Some(status) = &workspace.status_message {
                ui.add_space(5.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(SUCCESS_GREEN, status);
                });
            }

            if workspace.results().is_some_and(|r| !r.is_empty()) {
                ui.add_space(20.0);
                render_results(ui, workspace);
            }
        }

        if submit {
            self.submit();
        }
        if logout {
            if let Err(e) = self.router.logout(&mut self.session) {
                error!("Logout could not clear stored session: {e}");
            }
        }
    }

    fn submit(&mut self) {
        let View::Workspace(workspace) = self.router.view_mut() else {
            return;
        };

        match workspace.submit(&self.session) {
            Ok(()) => {
                workspace.error_message = None;
                workspace.status_message = None;
            }
            Err(e) if e.requires_login() => {
                warn!("Upload attempted without a session");
                if let Err(clear_err) = self.router.require_login(&mut self.session, &e) {
                    error!("Could not clear stored session: {clear_err}");
                }
            }
            Err(e) => workspace.error_message = Some(e.to_string()),
        }
    }
}

fn render_file_selection(ui: &mut egui::Ui, workspace: &mut WorkspaceState) {
    ui.group(|ui| {
        ui.label(RichText::new("Job Description (PDF)").strong());
        ui.horizontal(|ui| {
            if ui.button("📄 Select File").clicked() {
                if let Some(path) = FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
                    match SelectedFile::from_path(&path) {
                        Ok(file) => workspace.selection.set_job_description(file),
                        Err(e) => workspace.error_message = Some(e.to_string()),
                    }
                }
            }
            if let Some(file) = workspace.selection.job_description() {
                ui.label(format!("{} ({})", file.name, format_size(file.size)));
            }
        });
    });

    ui.add_space(10.0);

    ui.group(|ui| {
        ui.label(RichText::new("Resumes (PDF)").strong());
        ui.horizontal(|ui| {
            if ui.button("📁 Select Files").clicked() {
                if let Some(paths) = FileDialog::new().add_filter("PDF", &["pdf"]).pick_files() {
                    let files: Result<Vec<_>, _> =
                        paths.iter().map(|p| SelectedFile::from_path(p)).collect();
                    match files {
                        Ok(files) => workspace.selection.set_resumes(files),
                        Err(e) => workspace.error_message = Some(e.to_string()),
                    }
                }
            }
            let resumes = workspace.selection.resumes();
            if !resumes.is_empty() {
                ui.label(describe_batch(resumes.iter().map(|r| r.size)));
            }
        });

        let resumes = workspace.selection.resumes();
        if !resumes.is_empty() {
            egui::ScrollArea::vertical()
                .id_source("selected_resumes")
                .max_height(100.0)
                .show(ui, |ui| {
                    for resume in resumes {
                        ui.label(
                            RichText::new(&resume.name)
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    }
                });
        }
    });
}

fn render_results(ui: &mut egui::Ui, workspace: &mut WorkspaceState) {
    ui.horizontal(|ui| {
        ui.heading("Results");
        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
            if ui.button("Download as Excel").clicked() {
                export(workspace);
            }
        });
    });
    ui.add_space(10.0);

    let Some(results) = workspace.results() else {
        return;
    };
    let mut page_action = None;
    let mut open_error = None;

    egui::Grid::new("results_table")
        .striped(true)
        .num_columns(5)
        .spacing(egui::vec2(16.0, 8.0))
        .show(ui, |ui| {
            for title in ["Name", "Email", "Score", "Resume Profile", "Action"] {
                ui.label(RichText::new(title).strong());
            }
            ui.end_row();

            for result in results.pager().current_items() {
                ui.label(result.name.as_deref().unwrap_or("N/A"));
                ui.label(&result.email);
                ui.add(
                    egui::ProgressBar::new((result.similarity_score / 100.0).clamp(0.0, 1.0) as f32)
                        .desired_width(120.0)
                        .text(format!("{:.2}%", result.similarity_score)),
                );
                ui.label(result.category.as_deref().unwrap_or("N/A"));
                if ui.link("Download CV").clicked() {
                    if let Err(e) = open_download(workspace, results, result) {
                        open_error = Some(e);
                    }
                }
                ui.end_row();
            }
        });

    let pager = results.pager();
    ui.add_space(5.0);
    ui.label(
        RichText::new(format!(
            "Showing {}-{} of {}",
            pager.current_offset() + 1,
            pager.current_end(),
            pager.items().len()
        ))
        .color(ui.visuals().text_color().gamma_multiply(0.7)),
    );

    if pager.page_count() > 1 {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(pager.has_previous(), egui::Button::new("Previous"))
                .clicked()
            {
                page_action = Some(PageAction::Previous);
            }
            for n in 1..=pager.page_count() {
                if ui
                    .selectable_label(pager.current_page() == n, n.to_string())
                    .clicked()
                {
                    page_action = Some(PageAction::GoTo(n));
                }
            }
            if ui
                .add_enabled(pager.has_next(), egui::Button::new("Next"))
                .clicked()
            {
                page_action = Some(PageAction::Next);
            }
        });
    }

    if let Some(e) = open_error {
        workspace.error_message = Some(e);
    }
    if let (Some(action), Some(results)) = (page_action, workspace.results_mut()) {
        let pager = results.pager_mut();
        match action {
            PageAction::Previous => pager.previous(),
            PageAction::Next => pager.next(),
            PageAction::GoTo(n) => pager.go_to(n),
        }
    }
}

fn open_download(
    workspace: &WorkspaceState,
    results: &ResultSet,
    result: &MatchResult,
) -> Result<(), String> {
    let url = workspace
        .download_url(results.request_id(), result)
        .map_err(|e| e.to_string())?;
    open::that(url.as_str()).map_err(|e| format!("Failed to open {url}: {e}"))
}

fn export(workspace: &mut WorkspaceState) {
    if workspace.results().map_or(true, |r| r.is_empty()) {
        workspace.error_message = Some(ClientError::NothingToExport.to_string());
        return;
    }

    let Some(path) = FileDialog::new()
        .set_directory(workspace.export_dir())
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("Excel", &["xlsx"])
        .save_file()
    else {
        return;
    };

    match workspace.export(&path) {
        Ok(path) => {
            workspace.error_message = None;
            workspace.status_message = Some(format!("Saved {}", path.display()));
        }
        Err(e) => workspace.error_message = Some(e.to_string()),
    }
}
