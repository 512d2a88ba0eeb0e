use std::path::Path;

use console::Style;
use contrast_core::config::EnhanceConfig;
use contrast_core::enhance::EnhanceReport;
use contrast_core::histogram::Histogram;
use contrast_core::raster::Image;

use crate::timing::StageTimer;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

fn channel_name(channels: usize, channel: usize) -> String {
    match (channels, channel) {
        (1, _) => "Gray".to_string(),
        (3, 0) => "Red".to_string(),
        (3, 1) => "Green".to_string(),
        (3, 2) => "Blue".to_string(),
        (_, c) => format!("Channel {}", c + 1),
    }
}

pub fn print_image_info(image: &Image, path: &Path) {
    let s = Styles::new();
    println!(
        "  {:<14}{}",
        s.label.apply_to("File"),
        s.path.apply_to(path.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value
            .apply_to(format!("{}x{}", image.width(), image.height()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Channels"),
        s.value.apply_to(image.channels())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Max value"),
        s.value.apply_to(image.max_intensity())
    );
}

pub fn print_enhance_summary(
    input: &Path,
    output: &Path,
    config: &EnhanceConfig,
    report: &EnhanceReport,
    channels: usize,
    threads: usize,
    timer: &StageTimer,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Contrast Enhancement"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(threads)
    );
    println!();

    println!("  {}", s.header.apply_to("Stretch"));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Ignore"),
        s.value
            .apply_to(format!("{} ({} px per tail)", report.ignore_fraction, report.to_skip))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rounding"),
        s.method.apply_to(config.rounding)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Policy"),
        s.method.apply_to(report.policy)
    );
    for (channel, b) in report.bounds.iter().enumerate() {
        let range = if b.is_flat() {
            format!("{} (flat, mapped to 0)", b.low())
        } else {
            format!("{} .. {}", b.low(), b.high())
        };
        println!(
            "  {:<14}{}",
            s.label.apply_to(channel_name(channels, channel)),
            s.value.apply_to(range)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Timing (wall)"));
    for (label, duration) in timer.stages() {
        println!(
            "  {:<14}{}",
            s.label.apply_to(label),
            s.value.apply_to(format!("{:.3} s", duration.as_secs_f64()))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Total"),
        s.value
            .apply_to(format!("{:.3} s", timer.total().as_secs_f64()))
    );
    println!();
}

/// One line per (channel, bin): `label bin: count`.
pub fn print_histogram(title: &str, histogram: &Histogram) {
    let s = Styles::new();
    let channels = histogram.channels();

    println!("{}", s.header.apply_to(title));
    for entry in histogram.entries() {
        if entry.bin == 0 {
            println!("{}", s.method.apply_to(channel_name(channels, entry.channel)));
        }
        println!("{}: {}", entry.bin, entry.count);
    }
    println!();
}
