mod app;

use app::ChessApp;

const WINDOW_SIZE: [f32; 2] = [640.0, 700.0];
const TITLE: &str = "Chess";

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(ChessApp::new()))),
    )
}
