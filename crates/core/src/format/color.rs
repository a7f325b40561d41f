/// ANSI escape sequences for the text renderer.
///
/// A renderer is handed a palette explicitly; one without a palette writes
/// plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub reset: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub gray: &'static str,
    pub bold: &'static str,
}

impl Palette {
    pub const ANSI: Palette = Palette {
        reset: "\x1b[0m",
        red: "\x1b[31m",
        green: "\x1b[32m",
        yellow: "\x1b[33m",
        gray: "\x1b[90m",
        bold: "\x1b[1m",
    };

    /// Wrap `text` in `codes`, resetting afterwards.
    pub fn paint(&self, codes: &[&str], text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        for code in codes {
            out.push_str(code);
        }
        out.push_str(text);
        out.push_str(self.reset);
        out
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::ANSI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_wraps_and_resets() {
        let p = Palette::ANSI;
        assert_eq!(p.paint(&[p.red, p.bold], "x"), "\x1b[31m\x1b[1mx\x1b[0m");
        assert_eq!(p.paint(&[], "plain"), "plain\x1b[0m");
    }
}
