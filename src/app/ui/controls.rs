use eframe::egui::{self, Key, Response, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use track_scatter::plot::{FeatureSpecPair, ItemSource};

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
    integer_carry: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut i32,
    min: i32,
    max: i32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        hold_state = SliderKeyHoldState::default();
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    if increase_down {
        hold_state.positive_secs += delta_time;
    } else {
        hold_state.positive_secs = 0.0;
    }

    if decrease_down {
        hold_state.negative_secs += delta_time;
    } else {
        hold_state.negative_secs = 0.0;
    }

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        hold_state.integer_carry = 0.0;
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs) * 0.1;
    hold_state.integer_carry += direction as f32 * speed * delta_time;

    let whole_delta = hold_state.integer_carry.trunc() as i32;
    hold_state.integer_carry -= whole_delta as f32;

    let old_value = *value;
    if whole_delta != 0 {
        *value = value.saturating_add(whole_delta).clamp(min, max);
    }
    ui.ctx().request_repaint();

    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    *value != old_value
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn same_feature(a: &FeatureSpecPair, b: &FeatureSpecPair) -> bool {
    a.target == b.target && a.feature == b.feature && a.projection == b.projection
}

fn feature_picker(
    ui: &mut Ui,
    id: &str,
    search: &mut String,
    current: &mut Option<FeatureSpecPair>,
    specs: &[FeatureSpecPair],
) -> bool {
    let mut changed = false;
    let selected_text = current
        .as_ref()
        .map_or_else(|| "none".to_owned(), ToString::to_string);

    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .width(280.0)
        .show_ui(ui, |ui| {
            ui.text_edit_singleline(search)
                .on_hover_text("Type to fuzzy-filter the features.");

            let matcher = SkimMatcherV2::default();
            let query = search.trim();
            let mut ranked = specs
                .iter()
                .filter_map(|spec| {
                    if query.is_empty() {
                        return Some((0, spec));
                    }
                    fuzzy_match_score(&matcher, &spec.to_string(), query).map(|score| (score, spec))
                })
                .collect::<Vec<_>>();
            ranked.sort_by(|a, b| b.0.cmp(&a.0));

            if ui.selectable_label(current.is_none(), "none").clicked() && current.is_some() {
                *current = None;
                changed = true;
            }
            for (_, spec) in ranked {
                let is_current = current.as_ref().is_some_and(|c| same_feature(c, spec));
                let label = format!("{spec}  ({})", spec.target);
                if ui.selectable_label(is_current, label).clicked() && !is_current {
                    *current = Some(spec.clone());
                    changed = true;
                }
            }
        });

    if let Some(spec) = current.as_mut()
        && spec.is_edge_feature()
    {
        changed |= ui
            .checkbox(&mut spec.incoming, "Read from incoming link")
            .on_hover_text("Off: use the spot's outgoing link. Spots with zero or several links in that direction are not plotted.")
            .changed();
    }

    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Plot Controls");
        ui.separator();
        ui.add_space(4.0);

        let specs = self.plot.features().specs();
        let mut config_changed = false;

        ui.label("X axis");
        config_changed |= feature_picker(
            ui,
            "x_axis_picker",
            &mut self.x_search,
            &mut self.config.x,
            &specs,
        );
        ui.add_space(4.0);
        ui.label("Y axis");
        config_changed |= feature_picker(
            ui,
            "y_axis_picker",
            &mut self.y_search,
            &mut self.config.y,
            &specs,
        );

        ui.separator();

        ui.label("Spots to plot");
        for source in ItemSource::ALL {
            config_changed |= ui
                .radio_value(&mut self.config.item_source, source, source.label())
                .changed();
        }
        config_changed |= ui
            .checkbox(&mut self.config.draw_connected, "Draw links")
            .on_hover_text("Also draw the links between plotted spots.")
            .changed();

        ui.add_space(6.0);
        let plot_button = ui
            .add(egui::Button::new("Plot").min_size(egui::vec2(120.0, 0.0)))
            .on_hover_text("Rebuild the plot with the settings above.");
        if plot_button.clicked() {
            self.replot();
        } else if config_changed {
            self.config_pending = true;
        }
        if self.config_pending {
            ui.small("Settings changed; press Plot to apply.");
        }
        if let Some(note) = &self.last_rebuild_note {
            ui.small(note.as_str());
        }

        ui.separator();

        ui.label("Context");
        let mut context_changed = ui
            .checkbox(&mut self.follow_context, "Follow timepoint")
            .on_hover_text("With the Context source, only plot spots near the current timepoint.")
            .changed();
        ui.add_enabled_ui(self.follow_context, |ui| {
            let max_timepoint = self.max_timepoint;
            let timepoint_slider = ui
                .add(
                    egui::Slider::new(&mut self.context_timepoint, 0..=max_timepoint)
                        .text("Timepoint"),
                )
                .on_hover_text("Hover and hold the arrow keys to scrub.");
            if timepoint_slider.hovered() {
                timepoint_slider.request_focus();
            }
            context_changed |= timepoint_slider.changed();
            context_changed |= apply_slider_arrow_acceleration(
                ui,
                &timepoint_slider,
                &mut self.context_timepoint,
                0,
                max_timepoint,
            );

            context_changed |= ui
                .add(egui::Slider::new(&mut self.context_window, 0..=20).text("Frame window"))
                .on_hover_text("Also include spots this many frames before and after.")
                .changed();
        });
        if context_changed {
            self.apply_context();
        }

        ui.separator();

        ui.label("Color by");
        let vertex_specs = specs
            .into_iter()
            .filter(|spec| !spec.is_edge_feature())
            .collect::<Vec<_>>();
        if feature_picker(
            ui,
            "color_picker",
            &mut self.color_search,
            &mut self.color_by,
            &vertex_specs,
        ) {
            self.apply_color_by();
        }
    }
}
