use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{FormSnapshot, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub const APP_TITLE: &str = "Diagnosis Application";

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusLine {
    is_error: bool,
    message: String,
}

impl StatusLine {
    fn info(message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }
}

pub struct DiagnosisApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    disease_input: String,
    probability_input: String,
    results: String,
    status: StatusLine,
    // Buttons stay disabled until the backend answers the queued command.
    in_flight: bool,
}

impl DiagnosisApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            disease_input: String::new(),
            probability_input: String::new(),
            results: String::new(),
            status: StatusLine::info("Starting..."),
            in_flight: false,
        }
    }

    fn submit(&mut self, cmd: BackendCommand) {
        if self.in_flight {
            return;
        }
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => self.in_flight = true,
            Err(err) => self.status = StatusLine::error(err.status_line()),
        }
    }

    fn add_clicked(&mut self) {
        self.submit(BackendCommand::AddDiagnosis {
            disease: self.disease_input.clone(),
            probability: self.probability_input.clone(),
        });
    }

    fn load_clicked(&mut self) {
        self.submit(BackendCommand::LoadDiagnoses);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = StatusLine::info(message),
            UiEvent::FormUpdated(snapshot) => self.apply_snapshot(snapshot),
            UiEvent::Error(err) => {
                tracing::error!("backend error: {}", err.message());
                self.status = StatusLine::error(err.status_line());
                self.in_flight = false;
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: FormSnapshot) {
        self.in_flight = false;
        self.results = snapshot.display;
        self.status = match snapshot.notice {
            Some(notice) if notice.is_error() => StatusLine::error(notice.message()),
            Some(notice) => StatusLine::info(notice.message()),
            None => StatusLine::info(""),
        };
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        let mut add_clicked = false;
        let mut load_clicked = false;
        let idle = !self.in_flight;

        egui::TopBottomPanel::top("diagnosis_inputs").show(ctx, |ui| {
            ui.add_space(8.0);
            egui::Grid::new("diagnosis_input_grid")
                .num_columns(2)
                .spacing([10.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Disease Name:");
                    ui.text_edit_singleline(&mut self.disease_input);
                    ui.end_row();

                    ui.label("Probability:");
                    ui.text_edit_singleline(&mut self.probability_input);
                    ui.end_row();
                });
            ui.add_space(8.0);
        });

        egui::TopBottomPanel::bottom("diagnosis_actions").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                add_clicked = ui
                    .add_enabled(idle, egui::Button::new("Add Diagnosis"))
                    .clicked();
                load_clicked = ui
                    .add_enabled(idle, egui::Button::new("Load Results"))
                    .clicked();
            });
            if !self.status.message.is_empty() {
                let color = if self.status.is_error {
                    ui.visuals().error_fg_color
                } else {
                    ui.visuals().text_color()
                };
                ui.colored_label(color, &self.status.message);
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Diagnosis Results");
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut results = self.results.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut results)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            });
        });

        if add_clicked {
            self.add_clicked();
        } else if load_clicked {
            self.load_clicked();
        }
    }
}

impl eframe::App for DiagnosisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_form(ctx);
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
