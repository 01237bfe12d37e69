//! ZPL command builder
//!
//! Provides a fluent API for building Zebra Programming Language label
//! formats. Every format starts with `^XA` and [`ZplBuilder::build`] always
//! closes it with `^XZ`.

/// Field justification inside a `^FB` field block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

impl Justify {
    fn code(self) -> char {
        match self {
            Justify::Left => 'L',
            Justify::Center => 'C',
            Justify::Right => 'R',
        }
    }
}

/// Line color of a `^GB` graphic box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColor {
    Black,
    White,
}

impl LineColor {
    fn code(self) -> char {
        match self {
            LineColor::Black => 'B',
            LineColor::White => 'W',
        }
    }
}

/// ZPL command builder
///
/// Commands are written one per line; the printer ignores the line breaks.
pub struct ZplBuilder {
    buf: String,
}

impl ZplBuilder {
    /// Start a new label format (`^XA`)
    pub fn new() -> Self {
        let mut buf = String::with_capacity(512);
        buf.push_str("^XA\n");
        Self { buf }
    }

    fn cmd(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    // === Format Setup ===

    /// Interpret field data as UTF-8 (`^CI28`)
    pub fn utf8(&mut self) -> &mut Self {
        self.cmd("^CI28")
    }

    /// Print width in dots (`^PW`)
    pub fn print_width(&mut self, dots: u32) -> &mut Self {
        self.cmd(&format!("^PW{}", dots))
    }

    /// Label length in dots (`^LL`)
    pub fn label_length(&mut self, dots: u32) -> &mut Self {
        self.cmd(&format!("^LL{}", dots))
    }

    /// Label home position (`^LH`)
    pub fn label_home(&mut self, x: u32, y: u32) -> &mut Self {
        self.cmd(&format!("^LH{},{}", x, y))
    }

    // === Fields ===

    /// Centered single-line text field
    ///
    /// Emits `^FO`, `^FB`, `^A0N` and the field data on one line.
    pub fn text_block(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        font_size: u32,
        justify: Justify,
        text: &str,
    ) -> &mut Self {
        let line = format!(
            "^FO{},{}^FB{},1,0,{}^A0N,{},{}{}",
            x,
            y,
            width,
            justify.code(),
            font_size,
            font_size,
            field_data(text)
        );
        self.cmd(&line)
    }

    /// Plain text field at a fixed origin with a named font (`^FO` `^A`)
    pub fn text_at(&mut self, x: u32, y: u32, font: &str, text: &str) -> &mut Self {
        let line = format!("^FO{},{}^A{}{}", x, y, font, field_data(text));
        self.cmd(&line)
    }

    /// Graphic box (`^GB`), used for rules and strike-through lines
    pub fn graphic_box(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        thickness: u32,
        color: LineColor,
    ) -> &mut Self {
        let line = format!(
            "^FO{},{}^GB{},{},{},{},0^FS",
            x,
            y,
            width,
            height,
            thickness,
            color.code()
        );
        self.cmd(&line)
    }

    // === Job Control ===

    /// Print quantity (`^PQ`), repeated by the printer itself
    pub fn quantity(&mut self, copies: u32) -> &mut Self {
        self.cmd(&format!("^PQ{}", copies.max(1)))
    }

    /// View the format built so far (without `^XZ`)
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Close the format (`^XZ`) and return the encoded bytes
    pub fn build(mut self) -> Vec<u8> {
        self.buf.push_str("^XZ\n");
        self.buf.into_bytes()
    }
}

impl Default for ZplBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode field data as `^FD...^FS`
///
/// Text containing the `^` or `~` prefixes would end the field early, so it
/// is sent with `^FH` and `_XX` hex escapes instead.
fn field_data(text: &str) -> String {
    if !text.contains(['^', '~']) {
        return format!("^FD{}^FS", text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '^' => escaped.push_str("_5E"),
            '~' => escaped.push_str("_7E"),
            '_' => escaped.push_str("_5F"),
            c => escaped.push(c),
        }
    }
    format!("^FH^FD{}^FS", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_envelope() {
        let mut b = ZplBuilder::new();
        b.utf8().print_width(248).label_length(176);
        let s = String::from_utf8(b.build()).unwrap();

        assert!(s.starts_with("^XA\n"));
        assert!(s.trim_end().ends_with("^XZ"));
        assert!(s.contains("^CI28"));
        assert!(s.contains("^PW248"));
        assert!(s.contains("^LL176"));
    }

    #[test]
    fn test_text_block() {
        let mut b = ZplBuilder::new();
        b.text_block(10, 70, 248, 40, Justify::Center, "100 HUF");
        assert!(b.as_str().contains("^FO10,70^FB248,1,0,C^A0N,40,40^FD100 HUF^FS"));
    }

    #[test]
    fn test_graphic_box() {
        let mut b = ZplBuilder::new();
        b.graphic_box(10, 45, 228, 4, 4, LineColor::Black);
        assert!(b.as_str().contains("^FO10,45^GB228,4,4,B,0^FS"));
    }

    #[test]
    fn test_quantity_never_zero() {
        let mut b = ZplBuilder::new();
        b.quantity(0);
        assert!(b.as_str().contains("^PQ1"));
    }

    #[test]
    fn test_control_characters_escaped() {
        assert_eq!(field_data("plain"), "^FDplain^FS");
        assert_eq!(field_data("a^b~c_d"), "^FH^FDa_5Eb_7Ec_5Fd^FS");
    }

    #[test]
    fn test_utf8_text_passes_through() {
        let mut b = ZplBuilder::new();
        b.utf8().text_block(0, 0, 100, 20, Justify::Left, "1 499 Kč");
        let s = String::from_utf8(b.build()).unwrap();
        assert!(s.contains("^FD1 499 Kč^FS"));
    }
}
