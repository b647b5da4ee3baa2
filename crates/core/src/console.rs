//! Console diagnostics: the nested trace, the give-up banner, and the
//! inspection dump.
//!
//! Automation scripts that push rows all night need scrollback a human
//! can skim the next morning: banner lines marking where a sub-task
//! started and ended, plain lines indented under them, a slab of ASCII
//! art where a remote write ran out of retries, and a pretty-printed
//! dump of whatever a script wants to inspect. Everything here writes
//! to stderr; stdout stays clean for command output.

use unicode_width::UnicodeWidthStr;

/// Total banner width in display columns.
const BANNER_WIDTH: usize = 80;

/// Nested debug trace.
///
/// [`enter`](Trace::enter) prints a banner and deepens the indent by one
/// two-column unit (a space plus the section's symbol); [`leave`](Trace::leave)
/// backs out and prints the closing banner at the shallower depth. Plain
/// [`line`](Trace::line)s render as `"{indent} |{msg}"`. A disabled trace
/// prints nothing and tracks nothing.
#[derive(Debug, Default)]
pub struct Trace {
    enabled: bool,
    symbols: Vec<char>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            symbols: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// How many sections are currently open.
    pub fn depth(&self) -> usize {
        self.symbols.len()
    }

    /// Print a plain line under the current nesting.
    pub fn line(&self, msg: &str) {
        if self.enabled {
            eprintln!("{} |{}", self.indent(), msg);
        }
    }

    /// Open a section: banner at the current depth, then one level deeper.
    /// `symbol` fills the banner and marks every nested line until the
    /// matching [`leave`](Trace::leave).
    pub fn enter(&mut self, msg: &str, symbol: char) {
        if !self.enabled {
            return;
        }
        eprintln!("{}", render_banner(&self.indent(), msg, symbol));
        self.symbols.push(symbol);
    }

    /// Close the innermost section: back out one level, then print the
    /// closing banner with that section's symbol. With nothing open this
    /// prints nothing.
    pub fn leave(&mut self, msg: &str) {
        if !self.enabled {
            return;
        }
        if let Some(symbol) = self.symbols.pop() {
            eprintln!("{}", render_banner(&self.indent(), msg, symbol));
        }
    }

    fn indent(&self) -> String {
        self.symbols.iter().flat_map(|s| [' ', *s]).collect()
    }
}

/// `{indent} sym sym << msg >> sym sym`, padded with the symbol out to
/// [`BANNER_WIDTH`] display columns. A message too long to pad still
/// renders, just wider than the gutter.
fn render_banner(indent: &str, msg: &str, symbol: char) -> String {
    let label = format!(" << {} >> ", msg);
    let body = BANNER_WIDTH
        .saturating_sub(UnicodeWidthStr::width(indent))
        .saturating_sub(UnicodeWidthStr::width(label.as_str()));
    let left = body / 2;
    let right = body - left;

    let mut line = String::from(indent);
    line.extend(std::iter::repeat(symbol).take(left));
    line.push_str(&label);
    line.extend(std::iter::repeat(symbol).take(right));
    line
}

// ── Banners ─────────────────────────────────────────────────────────

/// Printed when a remote write gives up for good.
pub const TIMED_OUT_BANNER: &[&str] = &[
    r#" _____ _                    _    ___        _"#,
    r#"|_   _(_)_ __ ___   ___  __| |  / _ \ _   _| |_"#,
    r#"  | | | | '_ ` _ \ / _ \/ _` | | | | | | | | __|"#,
    r#"  | | | | | | | | |  __/ (_| | | |_| | |_| | |_"#,
    r#"  |_| |_|_| |_| |_|\___|\__,_|  \___/ \__,_|\__|"#,
];

/// Printed ahead of an inspection dump.
const GOTCHA_BANNER: &[&str] = &[
    r#"  ____       _       _             _   _   _"#,
    r#" / ___| ___ | |_ ___| |__   __ _  | | | | | |"#,
    r#"| |  _ / _ \| __/ __| '_ \ / _` | | | | | | |"#,
    r#"| |_| | (_) | || (__| | | | (_| | |_| |_| |_|"#,
    r#" \____|\___/ \__\___|_| |_|\__,_| (_) (_) (_)"#,
];

/// Print the give-up banner to stderr.
///
/// Loud on purpose: a push that exhausted its retries used to kill the
/// whole process, and the art is what made that visible in a night of
/// scrollback. Now the failure comes back as an error value and the
/// banner is only the visible marker.
pub fn print_abort_banner() {
    eprintln!();
    for line in TIMED_OUT_BANNER {
        eprintln!("{}", line);
    }
    eprintln!();
}

/// Print the catch banner followed by `value`, pretty-printed.
///
/// An inspection checkpoint for scripts: unmissable in scrollback, and
/// shows exactly what the script was holding. Pass an empty label to
/// dump the value alone. Stopping afterwards is the caller's call.
pub fn dump<T: std::fmt::Debug>(label: &str, value: &T) {
    eprintln!();
    for line in GOTCHA_BANNER {
        eprintln!("{}", line);
    }
    eprintln!();
    if label.is_empty() {
        eprintln!("{:#?}", value);
    } else {
        eprintln!("{} = {:#?}", label, value);
    }
}
