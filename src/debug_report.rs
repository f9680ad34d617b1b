use flextime::{Field, FlexError, FlexTime, FormatTag, OutputFormat, Preset};
use std::time::Duration;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Everything the inspector prints for one successfully read input.
pub struct Report {
    pub tag: Option<FormatTag>,
    pub value: FlexTime,
    pub preset: Preset,
    pub elapsed: Duration,
}

pub fn print_run(input: &str, report: &Report, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Reading: \"{}\"", input.trim()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Inference ━━━", ansi::GRAY));
    print_inference(report, &palette);

    println!("\n{}", palette.paint("━━━ Fields ━━━", ansi::GRAY));
    print_fields(&report.value, &palette);

    println!("\n{}", palette.paint("━━━ Renderings ━━━", ansi::GRAY));
    print_renderings(report, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", report.elapsed), ansi::GREEN));
    println!();
}

pub fn print_failure(input: &str, err: &FlexError, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Reading: \"{}\"", input.trim()), ansi::CYAN)));
    eprintln!("\n  {} {}", palette.paint("✗", ansi::RED), palette.paint(err.to_string(), ansi::RED));
    if matches!(err, FlexError::InvalidFormat(_)) {
        eprintln!("\n{}", palette.paint("Accepted shapes:", ansi::YELLOW));
        for tag in FormatTag::ALL {
            eprintln!("  • {}", tag);
        }
        eprintln!("  • RFC 3339 / RFC 2822 strings and English phrases (\"next friday 8pm\")");
        eprintln!("\n{}", palette.dim("  Tip: set FLEXTIME_LOG=debug to see which stages were tried"));
    }
    eprintln!();
}

fn print_inference(report: &Report, palette: &ansi::Palette) {
    let tag = match report.tag {
        Some(tag) => palette.paint(tag.as_str(), ansi::GREEN),
        None => palette.paint("free-form", ansi::YELLOW),
    };
    let value = &report.value;
    let precision = value.precision().map(|f| f.name()).unwrap_or("none");

    println!("  {} {}", palette.dim("format:   "), tag);
    println!("  {} {}", palette.dim("instant:  "), palette.bold(value.to_full()));
    println!("  {} {}", palette.dim("mask:     "), palette.paint(value.mask_str(), ansi::BLUE));
    println!("  {} {}", palette.dim("precision:"), palette.paint(precision, ansi::CYAN));
}

fn print_fields(value: &FlexTime, palette: &ansi::Palette) {
    for field in Field::ALL {
        let mark = if value.is_significant(field) {
            palette.paint("✓", ansi::GREEN)
        } else {
            palette.dim("✗ masked")
        };
        println!("  {} {:>5}  {}", palette.paint(format!("{:<12}", field.name()), ansi::BLUE), value.get(field), mark);
    }
}

fn print_renderings(report: &Report, palette: &ansi::Palette) {
    let active = report.preset.options().output;
    let formats = [OutputFormat::Components, OutputFormat::Minimal, OutputFormat::Full, OutputFormat::Flex];
    for format in formats {
        let label = format!("{:<11}", format.as_str());
        let marker = if format == active { palette.paint("◀ preset", ansi::YELLOW) } else { String::new() };
        println!(
            "  {} {} {}",
            palette.paint(label, ansi::CYAN),
            palette.bold(report.value.to_str(format)),
            marker
        );
    }
}
