use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Color as CtColor, Stylize};
use loudness_normalizer::batch::{BatchReport, FileReport, Outcome, RunSummary};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

pub mod marks {
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
    pub const SKIP: &str = "○";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════════════════════════

fn outcome_style(outcome: &Outcome) -> (&'static str, CtColor) {
    match outcome {
        Outcome::Processed(_) => (marks::CHECK, colors::GREEN),
        Outcome::Skipped => (marks::SKIP, colors::DIM),
        Outcome::ToleranceFailed(_) | Outcome::MeasurementAbsent => {
            (marks::CROSS_MARK, colors::ORANGE)
        }
        Outcome::ToolFailure(_) | Outcome::AccessError(_) => (marks::CROSS_MARK, colors::RED),
    }
}

fn print_file_line(file: &FileReport, name_width: usize) {
    let (mark, color) = outcome_style(&file.outcome);
    let padding = name_width.saturating_sub(file.file_name.width());
    println!(
        " {} {}:{} {}",
        mark.with(color).bold(),
        file.file_name.as_str().with(colors::CYAN),
        " ".repeat(padding),
        file.outcome.to_string().with(color)
    );
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Summary:".with(colors::CYAN).bold());
    println!(
        "Processed: {}, Skipped: {}, Errors: {} (Total: {})",
        summary.processed.to_string().with(colors::GREEN).bold(),
        summary.skipped.to_string().with(colors::DIM).bold(),
        summary.errored.to_string().with(colors::RED).bold(),
        summary.total
    );
}

/// Prints one line per file, then the summary.
pub fn print_report(report: &BatchReport) {
    let name_width = report
        .files
        .iter()
        .map(|f| f.file_name.width())
        .max()
        .unwrap_or(0);

    for file in &report.files {
        print_file_line(file, name_width);
    }
    print_summary(&report.summary);
}
