//! Main application state and UI

use eframe::egui;
use std::sync::Arc;

use caduceus_dna::{
    length_readout, plot_caption, write_report, ApiError, AppConfig, Controller, HttpBackend,
    Mode, MultiLabelResult, PredictionResult, SingleLabelResult, Tab, REPORT_FILE_NAME,
};

const POSITIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);
const NEGATIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 170, 70);
const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 180, 255);
const BADGE_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 90, 60);

const PLOT_COLUMNS: usize = 3;
const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(320.0, 220.0);

/// Application state
pub struct CaduceusApp {
    controller: Controller,

    // Gallery state
    selected_plot: Option<usize>,

    // Export
    export_error: Option<String>,

    // Deferred actions
    pending_export: bool,
}

impl CaduceusApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, ApiError> {
        // Plot thumbnails are remote PNGs
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let backend = HttpBackend::new(&config)?;
        Ok(Self {
            controller: Controller::new(Arc::new(backend), &config),
            selected_plot: None,
            export_error: None,
            pending_export: false,
        })
    }

    fn submit_prediction(&mut self) {
        match self.controller.submit_prediction() {
            Ok(()) => self.selected_plot = None,
            Err(e) => tracing::debug!(error = %e, "prediction not submitted"),
        }
    }

    fn submit_shap_analysis(&mut self) {
        match self.controller.submit_shap_analysis() {
            Ok(()) => self.selected_plot = None,
            Err(e) => tracing::debug!(error = %e, "SHAP analysis not submitted"),
        }
    }

    fn export_report(&mut self) {
        let Some(report) = &self.controller.state().shap_report else {
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("HTML", &["html"])
            .set_file_name(REPORT_FILE_NAME)
            .save_file()
        {
            match write_report(report, &path) {
                Ok(()) => self.export_error = None,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "report export failed");
                    self.export_error = Some(format!("Failed to export report: {}", e));
                }
            }
        }
    }
}

impl eframe::App for CaduceusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.is_loading() {
            self.controller.poll();
            ctx.request_repaint();
        }

        if self.pending_export {
            self.pending_export = false;
            self.export_report();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let has_report = self.controller.state().shap_report.is_some();
                    if ui
                        .add_enabled(has_report, egui::Button::new("Export SHAP Report..."))
                        .clicked()
                    {
                        self.pending_export = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Tab bar
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let active = self.controller.state().active_tab;
                for tab in Tab::ALL {
                    if ui.selectable_label(active == tab, tab.label()).clicked() {
                        self.controller.set_active_tab(tab);
                    }
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.controller.state();
                if state.loading {
                    ui.spinner();
                    ui.label("Waiting for the prediction service...");
                } else if let Some(ref report) = state.shap_report {
                    ui.label(format!("SHAP: {}", report.plot_count_label()));
                } else if state.prediction.is_some() {
                    ui.label(format!("{} prediction ready", state.mode.label()));
                } else if state.sequence.is_empty() {
                    ui.label("Enter a DNA sequence to begin");
                } else {
                    ui.label(format!(
                        "{} | Sequence: {} bp",
                        state.mode.label(),
                        state.sequence.len()
                    ));
                }
            });
        });

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let active_tab = self.controller.state().active_tab;
                match active_tab {
                    Tab::Input => self.show_input_tab(ui),
                    Tab::Predictions => self.show_predictions_tab(ui),
                    Tab::Analysis => self.show_analysis_tab(ui),
                }

                let error = &self.controller.state().error_message;
                if !error.is_empty() {
                    ui.add_space(10.0);
                    ui.colored_label(egui::Color32::RED, format!("Error: {}", error));
                }
            });
        });

        // Full-size plot viewer
        if self.selected_plot.is_some() {
            self.show_plot_viewer(ctx);
        }
    }
}

impl CaduceusApp {
    fn show_input_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("DNA Sequence Analysis");
        ui.label("Hereditary Cancer Predisposing Syndrome Detection");
        ui.separator();

        let max_length = self.controller.max_sequence_length();

        ui.horizontal(|ui| {
            ui.label("Patient ID (optional):");
            let mut patient_id = self.controller.state().patient_id.clone();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut patient_id)
                        .hint_text("Enter patient identifier"),
                )
                .changed()
            {
                self.controller.set_patient_id(&patient_id);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Classifier type:");
            let current = self.controller.state().mode;
            for mode in [Mode::Single, Mode::Multi] {
                if ui.selectable_label(current == mode, mode.label()).clicked() {
                    self.controller.set_mode(mode);
                }
            }
        });

        ui.add_space(5.0);

        ui.group(|ui| {
            ui.heading("DNA Sequence");

            let mut sequence = self.controller.state().sequence.clone();
            let response = ui.add(
                egui::TextEdit::multiline(&mut sequence)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY)
                    .desired_rows(6)
                    .hint_text("Enter DNA sequence (A, T, C, G)...\n\nExample: ATCGATCGATCG"),
            );
            if response.changed() {
                self.controller.set_sequence(&sequence);
            }

            let exceeds = self.controller.sequence_exceeds_limit();
            let current = &self.controller.state().sequence;
            let readout = length_readout(current, max_length);
            if exceeds {
                ui.colored_label(egui::Color32::RED, readout);
                ui.colored_label(
                    egui::Color32::RED,
                    format!(
                        "Sequence exceeds {} nucleotides and will be truncated on the server",
                        max_length
                    ),
                );
            } else if current.is_empty() {
                ui.colored_label(egui::Color32::GRAY, readout);
            } else {
                ui.colored_label(ACCENT_COLOR, readout);
            }
        });

        ui.add_space(5.0);

        ui.group(|ui| {
            let mode = self.controller.state().mode;
            ui.strong(mode.model_title());
            ui.label(format!(
                "{} Maximum sequence length is {} nucleotides.",
                mode.description(),
                max_length
            ));
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            let loading = self.controller.is_loading();
            let label = if loading {
                "Analyzing DNA Sequence..."
            } else {
                "Analyze DNA Sequence"
            };
            if ui
                .add_enabled(self.controller.can_submit(), egui::Button::new(label))
                .clicked()
            {
                self.submit_prediction();
            }
            if loading {
                ui.spinner();
            }
        });
    }

    fn show_predictions_tab(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.state();
        let Some(prediction) = state.prediction.clone() else {
            ui.heading("Analysis Results");
            ui.separator();
            ui.label(egui::RichText::new("No Results Yet").strong().size(18.0));
            ui.label("Run an analysis to see predictions here");
            return;
        };
        let patient_id = state.patient_id.clone();
        let loading = state.loading;
        let offer_shap = self.controller.can_offer_shap();

        ui.horizontal(|ui| {
            ui.heading("Analysis Results");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if offer_shap {
                    let label = if loading {
                        "Running SHAP..."
                    } else {
                        "Run SHAP Analysis"
                    };
                    if ui.add_enabled(!loading, egui::Button::new(label)).clicked() {
                        self.submit_shap_analysis();
                    }
                }
                if ui.button("Back to Input").clicked() {
                    self.controller.set_active_tab(Tab::Input);
                }
            });
        });

        if !patient_id.is_empty() {
            ui.label(format!("Patient: {}", patient_id));
        }
        ui.separator();

        match &prediction {
            PredictionResult::Single(single) => show_single_result(ui, single),
            PredictionResult::Multi(multi) => show_multi_result(ui, multi),
        }
    }

    fn show_analysis_tab(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.controller.state().shap_report.clone() else {
            ui.heading("SHAP Analysis");
            ui.separator();
            ui.label(egui::RichText::new("No SHAP Data Available").strong().size(18.0));
            ui.label("Run a SHAP analysis from the predictions tab to see results here");
            if ui.button("Back to Predictions").clicked() {
                self.controller.set_active_tab(Tab::Predictions);
            }
            return;
        };

        ui.horizontal(|ui| {
            ui.heading("SHAP Analysis");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Download Report").clicked() {
                    self.pending_export = true;
                }
                if ui.button("Back to Predictions").clicked() {
                    self.controller.set_active_tab(Tab::Predictions);
                }
            });
        });
        ui.label("Feature Importance & Interpretability");
        ui.separator();

        if let Some(summary) = report.summary.as_deref().filter(|s| !s.is_empty()) {
            ui.group(|ui| {
                ui.strong("Analysis Summary");
                ui.add(
                    egui::Label::new(egui::RichText::new(summary).monospace())
                        .wrap_mode(egui::TextWrapMode::Wrap),
                );
            });
            ui.add_space(5.0);
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(report.plot_count_label()).strong());
            ui.weak("Click any plot to view full size");
        });

        if let Some(ref error) = self.export_error {
            ui.colored_label(egui::Color32::RED, error);
        }

        ui.add_space(5.0);

        egui::Grid::new("plot_gallery")
            .num_columns(PLOT_COLUMNS)
            .spacing([16.0, 16.0])
            .show(ui, |ui| {
                for (i, url) in report.plots.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(format!("#{}", i + 1))
                                .strong()
                                .color(ACCENT_COLOR),
                        );
                        let thumbnail = egui::Image::from_uri(url.as_str())
                            .fit_to_exact_size(THUMBNAIL_SIZE)
                            .sense(egui::Sense::click());
                        if ui
                            .add(thumbnail)
                            .on_hover_text("Click to view full size")
                            .clicked()
                        {
                            self.selected_plot = Some(i);
                        }
                        ui.strong(plot_caption(url));
                        ui.weak("SHAP Visualization");
                    });
                    if (i + 1) % PLOT_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn show_plot_viewer(&mut self, ctx: &egui::Context) {
        let Some(index) = self.selected_plot else {
            return;
        };

        // The report may have been replaced or cleared since the click
        let Some(url) = self
            .controller
            .state()
            .shap_report
            .as_ref()
            .and_then(|r| r.plots.get(index))
            .cloned()
        else {
            self.selected_plot = None;
            return;
        };

        let mut close_clicked = false;
        let modal = egui::Modal::new(egui::Id::new("plot_viewer")).show(ctx, |ui| {
            ui.set_max_width(ctx.screen_rect().width() * 0.9);
            ui.horizontal(|ui| {
                ui.heading(format!("Plot #{}", index + 1));
                ui.label(plot_caption(&url));
            });
            ui.separator();
            egui::ScrollArea::both()
                .max_height(ctx.screen_rect().height() * 0.75)
                .show(ui, |ui| {
                    ui.add(egui::Image::from_uri(url.as_str()).shrink_to_fit());
                });
            ui.separator();
            if ui.button("Close").clicked() {
                close_clicked = true;
            }
        });

        // Escape and clicks on the backdrop also dismiss
        if close_clicked || modal.should_close() {
            self.selected_plot = None;
        }
    }
}

fn show_single_result(ui: &mut egui::Ui, single: &SingleLabelResult) {
    let color = if single.is_positive() {
        POSITIVE_COLOR
    } else {
        NEGATIVE_COLOR
    };

    egui::Grid::new("single_result")
        .num_columns(2)
        .spacing([40.0, 8.0])
        .show(ui, |ui| {
            ui.strong("Result");
            ui.strong("Confidence");
            ui.end_row();

            ui.label(egui::RichText::new(&single.result).size(24.0).strong().color(color));
            ui.label(egui::RichText::new(&single.confidence).size(24.0).strong());
            ui.end_row();
        });
}

fn show_multi_result(ui: &mut egui::Ui, multi: &MultiLabelResult) {
    ui.group(|ui| {
        ui.strong("Detected Syndromes (above threshold)");
        ui.horizontal_wrapped(|ui| {
            for disease in &multi.detected {
                ui.label(
                    egui::RichText::new(disease)
                        .strong()
                        .color(egui::Color32::WHITE)
                        .background_color(BADGE_COLOR),
                );
            }
        });
    });

    ui.add_space(10.0);
    ui.strong("Probability Rankings");

    egui::Grid::new("probability_rankings")
        .num_columns(3)
        .striped(true)
        .spacing([20.0, 6.0])
        .show(ui, |ui| {
            ui.strong("#");
            ui.strong("Disease");
            ui.strong("Probability");
            ui.end_row();

            for row in multi.ranked_rows() {
                ui.label(row.rank.to_string());
                ui.label(&row.disease);
                ui.horizontal(|ui| {
                    ui.add(
                        egui::ProgressBar::new(row.probability as f32)
                            .desired_width(240.0),
                    );
                    ui.monospace(&row.percentage);
                });
                ui.end_row();
            }
        });
}
