use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use golfball::drag::curves::STANDARD_CURVE_FILES;
use golfball::{run, BallParams, DragTable, LaunchConditions, RunOutput, SimInputs, TimeGrid};

/// One run per calibrated dimple ratio, default launch otherwise.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let inputs = SimInputs::default();
    let table = DragTable::standard()?;
    let launch = inputs.launch();
    let grid = inputs.grid()?;

    let mut runs = Vec::new();
    for (ratio, _) in STANDARD_CURVE_FILES {
        let params = BallParams { dimple_ratio: ratio, ..inputs.ball_params() };
        let out = run(&params, &launch, &grid, &table, inputs.config.trim)?;
        runs.push((ratio, out));
    }

    let app = FlightViz { launch, grid, runs };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Golf Ball Flight", options, Box::new(|_| Ok(Box::new(app))))?;
    Ok(())
}

struct FlightViz {
    launch: LaunchConditions,
    grid: TimeGrid,
    runs: Vec<(f64, RunOutput)>,
}

impl FlightViz {
    fn plot<F>(&self, ui: &mut egui::Ui, id: &str, x_label: &str, size: (f32, f32), equal: bool, series: F)
    where
        F: Fn(&RunOutput) -> Vec<[f64; 2]>,
    {
        let mut plot = Plot::new(id)
            .width(size.0)
            .height(size.1)
            .x_axis_label(x_label)
            .legend(Legend::default());
        if equal {
            plot = plot.data_aspect(1.0);
        }
        plot.show(ui, |plot_ui| {
            for (ratio, out) in &self.runs {
                let points: PlotPoints = series(out).into_iter().collect();
                plot_ui.line(Line::new(format!("eD = {}", ratio), points));
            }
        });
    }
}

impl eframe::App for FlightViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Golf ball flight by dimple ratio");
            ui.label(format!(
                "Launch: {:.1} deg  |  azimuth {:.1} deg  |  {:.1} m/s  |  dt = {} s",
                self.launch.angle_deg,
                self.launch.azimuth_deg,
                self.launch.speed,
                self.grid.dt(),
            ));
            for (ratio, out) in &self.runs {
                ui.label(format!(
                    "eD = {:<7}  range {:7.2} m  height {:6.2} m  flight {:5.2} s",
                    ratio, out.qoi.max_range, out.qoi.max_height, out.qoi.time_of_flight
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let size = (available.x / 2.0 - 8.0, available.y / 2.0 - 8.0);

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Height (m)");
                    self.plot(ui, "profile", "Downrange (m)", size, true, |out| {
                        let rel = out.trajectory.relative_positions();
                        rel.iter().map(|r| [r.x.hypot(r.y), r.z]).collect()
                    });
                });
                ui.vertical(|ui| {
                    ui.label("Height (m)");
                    self.plot(ui, "height", "Time (s)", size, false, |out| {
                        let times = out.trajectory.times();
                        times.iter().zip(out.trajectory.heights()).map(|(&t, h)| [t, h]).collect()
                    });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    self.plot(ui, "speed", "Time (s)", size, false, |out| {
                        out.trajectory.iter().map(|(t, s)| [t, s.speed()]).collect()
                    });
                });
                ui.vertical(|ui| {
                    ui.label("Ground track, y (m)");
                    self.plot(ui, "track", "x (m)", size, true, |out| {
                        out.trajectory.relative_positions().iter().map(|r| [r.x, r.y]).collect()
                    });
                });
            });
        });
    }
}
