use crate::docker::ContainerRuntime;
use crate::history::{format_time_tick, MetricPlot};
use crate::launcher::Launcher;
use crate::logs::LogLevel;
use crate::theme::Theme;
use eframe::egui;
use egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use std::time::Instant;

const MENU_WIDTH: f32 = 300.0;
const LOG_PANE_HEIGHT: f32 = 150.0;
const BUTTON_HEIGHT: f32 = 32.0;

pub const DAPP_BUTTON_TEXT: &str = "Launch dApp";
pub const EXPLORER_BUTTON_TEXT: &str = "Explorer";
pub const COPY_ADDRESS_BUTTON_TEXT: &str = "Copy Address";
pub const EDIT_ENV_BUTTON_TEXT: &str = "Edit .env File";
pub const DELETE_AND_RESTART_BUTTON_TEXT: &str = "Delete and Restart";

pub struct LauncherApp<R: ContainerRuntime> {
    launcher: Launcher<R>,
    // Theme currently installed in the egui context
    applied_theme: Option<Theme>,
}

impl<R: ContainerRuntime> LauncherApp<R> {
    pub fn new(_cc: &eframe::CreationContext<'_>, launcher: Launcher<R>) -> Self {
        Self {
            launcher,
            applied_theme: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let theme = self.launcher.theme();
        if self.applied_theme != Some(theme) {
            ctx.set_visuals(theme.visuals());
            self.applied_theme = Some(theme);
        }
    }

    fn menu_button(ui: &mut Ui, text: &str) -> egui::Response {
        ui.add_sized([ui.available_width(), BUTTON_HEIGHT], egui::Button::new(text))
    }

    fn render_menu(&mut self, ui: &mut Ui, ctx: &egui::Context) {
        ui.add_space(10.0);

        let fill = if self.launcher.is_container_running() {
            Color32::from_rgb(200, 30, 30)
        } else {
            Color32::from_rgb(30, 140, 60)
        };
        let text = RichText::new(self.launcher.toggle_button_text())
            .color(Color32::WHITE)
            .strong();
        let toggle = egui::Button::new(text).fill(fill);
        if ui.add_sized([ui.available_width(), BUTTON_HEIGHT], toggle).clicked() {
            self.launcher.toggle_container();
        }

        if Self::menu_button(ui, DAPP_BUTTON_TEXT).clicked() {
            ctx.open_url(egui::OpenUrl::new_tab(&self.launcher.config().dapp_url));
        }
        if Self::menu_button(ui, EXPLORER_BUTTON_TEXT).clicked() {
            ctx.open_url(egui::OpenUrl::new_tab(&self.launcher.config().explorer_url));
        }

        // Bottom-up: the last widget added sits highest
        ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
            ui.add_space(10.0);

            if Self::menu_button(ui, self.launcher.theme().toggle_label()).clicked() {
                self.launcher.toggle_theme();
            }

            if Self::menu_button(ui, DELETE_AND_RESTART_BUTTON_TEXT).clicked() && confirm_delete() {
                self.launcher.delete_and_restart();
            }

            if Self::menu_button(ui, EDIT_ENV_BUTTON_TEXT).clicked() {
                self.launcher.edit_env_file();
            }

            if Self::menu_button(ui, COPY_ADDRESS_BUTTON_TEXT).clicked() {
                let text = self.launcher.info().address.clone();
                ctx.output_mut(|o| o.copied_text = text);
            }

            ui.add_space(6.0);
            self.render_info_box(ui);
        });
    }

    fn render_info_box(&self, ui: &mut Ui) {
        let info = self.launcher.info();
        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, ui.visuals().widgets.noninteractive.fg_stroke.color))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    for line in [&info.address, &info.name, &info.uptime, &info.epoch, &info.epoch_avail] {
                        ui.label(RichText::new(line).monospace());
                    }
                });
            });
    }

    fn render_log_pane(&self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in self.launcher.logs().iter() {
                    let color = match entry.level {
                        LogLevel::Info => ui.visuals().text_color(),
                        LogLevel::Warning => Color32::from_rgb(255, 165, 0),
                        LogLevel::Error => Color32::from_rgb(255, 50, 50),
                    };
                    ui.label(RichText::new(entry.line()).monospace().color(color));
                }
            });
    }

    fn render_graphs(&self, ui: &mut Ui) {
        let plots = self.launcher.plots();
        let color = self.launcher.theme().plot_color();
        let plot_height = (ui.available_height() / 2.0 - 30.0).max(80.0);

        // 2x2 grid: CPU | Memory on top, GPU | GPU memory below
        ui.columns(2, |columns| {
            for (col, ui) in columns.iter_mut().enumerate() {
                for row in 0..2 {
                    if let Some(plot) = plots.get(row * 2 + col) {
                        render_plot(ui, plot, color, plot_height);
                    }
                }
            }
        });
    }

    fn render_env_editor(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut save = false;

        let Some(content) = self.launcher.env_editor_mut() else {
            return;
        };
        egui::Window::new("Edit .env File")
            .open(&mut open)
            .collapsible(false)
            .default_size([1000.0, 900.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 40.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(content)
                                .code_editor()
                                .desired_width(f32::INFINITY)
                                .desired_rows(30),
                        );
                    });
                if ui.add_sized([ui.available_width(), BUTTON_HEIGHT], egui::Button::new("Save")).clicked() {
                    save = true;
                }
            });

        if save {
            // Failures are already in the log pane and keep the editor open
            if let Err(e) = self.launcher.save_env_file() {
                log::debug!("Keeping .env editor open after failed save: {}", e);
            }
        } else if !open {
            self.launcher.close_env_editor();
        }
    }
}

fn render_plot(ui: &mut Ui, plot: &MetricPlot, color: Color32, height: f32) {
    let metric = plot.metric;
    ui.vertical_centered(|ui| ui.label(RichText::new(metric.title()).strong()));

    Plot::new(metric.title())
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Time")
        .y_axis_label(metric.label())
        .x_axis_formatter(|mark, _range| format_time_tick(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if plot.has_data() {
                plot_ui.line(
                    Line::new(PlotPoints::from(plot.points.clone()))
                        .color(color)
                        .width(2.0)
                        .name(metric.label()),
                );
            } else {
                plot_ui.points(
                    Points::new(vec![[0.0, 0.0]])
                        .radius(4.0)
                        .color(color)
                        .name("NO DATA"),
                );
            }
        });
}

fn confirm_delete() -> bool {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Delete and Restart")
        .set_description("Stop the edge node, delete its local history and address files, and start it again?")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        == rfd::MessageDialogResult::Yes
}

impl<R: ContainerRuntime> eframe::App for LauncherApp<R> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if self.launcher.refresh_due(now) {
            self.launcher.refresh_all();
        }
        ctx.request_repaint_after(self.launcher.until_next_refresh(now));

        self.apply_theme(ctx);

        egui::SidePanel::left("menu")
            .exact_width(MENU_WIDTH)
            .resizable(false)
            .show(ctx, |ui| self.render_menu(ui, ctx));

        egui::TopBottomPanel::bottom("log_pane")
            .exact_height(LOG_PANE_HEIGHT)
            .show(ctx, |ui| self.render_log_pane(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.render_graphs(ui));

        self.render_env_editor(ctx);
    }
}
