//! # Rendering Module
//!
//! Terminal output for command results. Every `render_*` function returns a
//! `String` so output can be tested without capturing stdout; `print_*`
//! wrappers write it.
//!
//! Layout (widths, truncation, padding) is Unicode-aware via `unicode-width`.
//! Colors come from `colored`, which turns itself off when stdout is not a
//! terminal or `NO_COLOR` is set.

use carousel::commands::{CmdMessage, MessageLevel, SlideRow, SliderSummary};
use carousel::model::{ImageHeight, SliderSettings};
use carousel::render::Fragment;
use chrono::{DateTime, Utc};
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 16;
const COUNT_WIDTH: usize = 12;
const INACTIVE_MARKER: &str = "○";
const ACTIVE_MARKER: &str = "●";

pub fn render_slider_list(sliders: &[SliderSummary]) -> String {
    if sliders.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    for summary in sliders {
        let slider = &summary.slider;
        let marker = if slider.settings.active {
            ACTIVE_MARKER.green()
        } else {
            INACTIVE_MARKER.dimmed()
        };
        let id = pad_to_width(&truncate_to_width(&slider.id, ID_WIDTH), ID_WIDTH);
        let counts = pad_to_width(
            &format!("{}/{} active", summary.active_slides, summary.total_slides),
            COUNT_WIDTH,
        );

        let fixed = 2 + ID_WIDTH + 1 + 1 + COUNT_WIDTH + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let name = pad_to_width(&truncate_to_width(&slider.name, available), available);

        output.push_str(&format!(
            "{} {} {} {} {}\n",
            marker,
            id.bold(),
            name,
            counts,
            format_time_ago(slider.modified_at).dimmed()
        ));
        output.push_str(&format!("  {}\n", summary.embed.cyan()));
    }
    output
}

pub fn render_slider_detail(summary: &SliderSummary, slides: &[SlideRow]) -> String {
    let slider = &summary.slider;
    let mut output = String::new();

    output.push_str(&format!("{} ({})\n", slider.name.bold(), slider.id));
    output.push_str(&format!("{}\n", summary.embed.cyan()));
    output.push_str("--------------------------------\n");
    for (key, value) in settings_lines(&slider.settings) {
        output.push_str(&format!("  {:<16} {}\n", key, value));
    }
    output.push_str("--------------------------------\n");
    output.push_str(&render_slide_rows(slides));
    output
}

fn settings_lines(settings: &SliderSettings) -> Vec<(&'static str, String)> {
    let on_off = |flag: bool| if flag { "on" } else { "off" }.to_string();
    vec![
        ("active", on_off(settings.active)),
        ("autoplay", on_off(settings.autoplay)),
        ("interval", format!("{} ms", settings.interval)),
        ("indicators", on_off(settings.indicators)),
        ("controls", on_off(settings.controls)),
        ("keyboard", on_off(settings.keyboard)),
        ("touch", on_off(settings.touch)),
        ("pause on hover", on_off(settings.pause_on_hover)),
        ("wrap", on_off(settings.wrap)),
        ("transition", settings.transition.as_str().to_string()),
        (
            "image height",
            match settings.image_height {
                ImageHeight::Auto => "auto".to_string(),
                ImageHeight::Pixels(px) => format!("{}px", px),
            },
        ),
        ("image fit", settings.image_fit.as_str().to_string()),
    ]
}

pub fn render_slide_rows(rows: &[SlideRow]) -> String {
    let mut output = String::new();
    for row in rows {
        let slide = &row.slide;
        let position = format!("{:>3}.", row.rank + 1);
        let id = format!("#{:<5}", slide.id);
        let marker = if slide.active {
            ACTIVE_MARKER.green()
        } else {
            INACTIVE_MARKER.dimmed()
        };

        let image = if slide.image.alt.is_empty() {
            format!("asset {}", slide.image.asset_id)
        } else {
            slide.image.alt.clone()
        };
        let mut detail = format!("{} | {}", image, row.caption.label());
        if let Some(button) = &row.button {
            detail.push_str(&format!(" | [{}]", button));
        }

        let fixed = position.width() + 1 + id.width() + 1 + 2 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let detail = pad_to_width(&truncate_to_width(&detail, available), available);

        output.push_str(&format!(
            "{} {} {} {}{}\n",
            position.yellow(),
            id.dimmed(),
            marker,
            detail,
            format_time_ago(slide.modified_at).dimmed()
        ));
    }
    output
}

pub fn render_fragments(fragments: &[Fragment]) -> String {
    let mut output = String::new();
    for fragment in fragments {
        output.push_str(&fragment.html());
        if !output.ends_with('\n') {
            output.push('\n');
        }
    }
    output
}

pub fn render_text_list(lines: &[String], empty_message: &str) -> String {
    if lines.is_empty() {
        return format!("{}\n", empty_message);
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut output = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        output.push_str(&format!("{}\n", line));
    }
    output
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages));
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel::commands::slide_rows;
    use carousel::merge::new_slide_defaults;
    use carousel::model::Slider;

    fn plain() {
        colored::control::set_override(false);
    }

    fn summary(id: &str, name: &str) -> SliderSummary {
        let now = Utc::now();
        let slider = Slider {
            id: id.to_string(),
            name: name.to_string(),
            settings: SliderSettings::default(),
            created_at: now,
            modified_at: now,
        };
        SliderSummary {
            embed: slider.embed_snippet("carousel"),
            slider,
            total_slides: 3,
            active_slides: 2,
        }
    }

    #[test]
    fn slider_list_shows_counts_and_snippet() {
        plain();
        let output = render_slider_list(&[summary("home", "Home page")]);
        assert!(output.contains("home"));
        assert!(output.contains("Home page"));
        assert!(output.contains("2/3 active"));
        assert!(output.contains("[carousel id=\"home\"]"));
    }

    #[test]
    fn long_names_are_truncated_to_the_line() {
        plain();
        let long = "Wide 表 ".repeat(40);
        let output = render_slider_list(&[summary("home", &long)]);
        let first_line = output.lines().next().unwrap();
        assert!(first_line.width() <= LINE_WIDTH);
        assert!(first_line.contains('…'));
    }

    #[test]
    fn slide_rows_show_rank_and_preview() {
        plain();
        let mut slide = new_slide_defaults(12, "home", 5, Utc::now());
        slide.image.alt = "Beach".to_string();
        slide.caption.enabled = true;
        slide.cta.enabled = true;
        slide.cta.text = "Book now".to_string();

        let output = render_slide_rows(&slide_rows(vec![slide]));
        assert!(output.contains("1."));
        assert!(output.contains("#12"));
        assert!(output.contains("Beach | Caption enabled (no text) | [Book now]"));
    }

    #[test]
    fn detail_lists_settings() {
        plain();
        let output = render_slider_detail(&summary("home", "Home"), &[]);
        assert!(output.contains("interval         5000 ms"));
        assert!(output.contains("transition       slide"));
    }

    #[test]
    fn messages_keep_their_text() {
        plain();
        let output = render_messages(&[
            CmdMessage::success("Slider created: Home (home)"),
            CmdMessage::warning("Slide not found: 9"),
        ]);
        assert_eq!(output, "Slider created: Home (home)\nSlide not found: 9\n");
    }

    #[test]
    fn text_list_falls_back_to_empty_message() {
        assert_eq!(render_text_list(&[], "Nothing here."), "Nothing here.\n");
    }
}
