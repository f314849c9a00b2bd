use eframe::egui;
use photo_pdf::{PhotoSelection, PreviewHandle};
use std::collections::HashMap;

/// Width of one grid cell in points
const CELL_SIZE: f32 = 160.0;

/// What the grid can show for a preview
pub enum PreviewState {
    Ready(egui::TextureHandle),
    Failed(String),
}

/// Draw the selected photos as a wrapping grid, in selection order.
///
/// Returns the index whose remove button was clicked this frame.
pub fn show_selection(
    ui: &mut egui::Ui,
    selection: &PhotoSelection,
    previews: &HashMap<PreviewHandle, PreviewState>,
) -> Option<usize> {
    if selection.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.heading("No photos selected");
            ui.add_space(10.0);
            ui.label("Click \"Select Photos…\" or drop image files here");
        });
        return None;
    }

    let mut remove = None;
    let error_color = ui.visuals().error_fg_color;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (index, (file, preview)) in selection.iter().enumerate() {
                    ui.group(|ui| {
                        ui.set_width(CELL_SIZE);
                        ui.vertical(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(format!("{}.", index + 1));
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        let button = ui.small_button("✖").on_hover_text("Remove");
                                        if button.clicked() {
                                            remove = Some(index);
                                        }
                                    },
                                );
                            });

                            match previews.get(preview) {
                                Some(PreviewState::Ready(texture)) => {
                                    let size = fit_size(texture.size_vec2(), CELL_SIZE);
                                    ui.image((texture.id(), size));
                                }
                                Some(PreviewState::Failed(message)) => {
                                    ui.colored_label(error_color, "Preview unavailable")
                                        .on_hover_text(message);
                                }
                                None => {
                                    ui.spinner();
                                }
                            }

                            ui.label(egui::RichText::new(file.display_name()).small())
                                .on_hover_text(file.path().display().to_string());
                        });
                    });
                }
            });
        });

    remove
}

/// Scale `size` down so its longer edge is at most `max_edge`
fn fit_size(size: egui::Vec2, max_edge: f32) -> egui::Vec2 {
    let longest = size.x.max(size.y);
    if longest <= max_edge || longest <= 0.0 {
        return size;
    }
    size * (max_edge / longest)
}
