//! Scene description parser
//!
//! Scene is a text with one command per line:
//! ```text
//! rectangle id="1" color="ff0000" x="0" y="0" width="2" height="2"
//! circle id="2" color="00ff00" x="5" y="5" radius="1"
//! triangle id="3" color="0000ff" ax="0" ay="9" bx="4" by="5" cx="9" cy="9"
//! ```
//! Values of `color` are hexadecimal, all other values are decimal.
use crate::{Circle, Command, Error, RGB, Rectangle, Shape, Triangle};
use std::{io::BufRead, str::FromStr};

/// Maximum length of a property (or shape) name
pub const MAX_PROPERTY_NAME_LEN: usize = 19;

/// Split line into tokens
///
/// Tokens are separated by runs of spaces, and every `=` is a token on its own,
/// so `x="1"` and `x = "1"` both produce `["x", "=", "\"1\""]`.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (index, byte) in line.bytes().enumerate() {
        if !matches!(byte, b' ' | b'=') {
            continue;
        }
        if start < index {
            tokens.push(&line[start..index]);
        }
        if byte == b'=' {
            tokens.push(&line[index..index + 1]);
        }
        start = index + 1;
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

/// Name/value pair extracted from a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    pub name: &'a str,
    pub value: i64,
}

/// Radix used to parse value of the property with the given name
fn property_radix(name: &str) -> u32 {
    if name == "color" { 16 } else { 10 }
}

fn check_name(name: &str, line: usize) -> Result<(), Error> {
    if name.len() > MAX_PROPERTY_NAME_LEN {
        return Err(Error::PropertyNameTooLong {
            line,
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Parse double quoted integer literal `"<digits>"`
///
/// Digits may be preceded by a sign, hexadecimal digits may also be preceded by `0x`.
pub fn parse_literal(token: &str, radix: u32, line: usize) -> Result<i64, Error> {
    let text = token
        .strip_prefix('"')
        .and_then(|text| text.strip_suffix('"'))
        .ok_or_else(|| Error::invalid_input(line, format!("value {} is not quoted", token)))?;
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = if radix == 16 {
        digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits)
    } else {
        digits
    };
    // `from_str_radix` accepts a sign on its own, it must appear only once
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(Error::invalid_input(
            line,
            format!("value {} is not an integer", token),
        ));
    }
    let value = i128::from_str_radix(digits, radix)
        .map_err(|_| Error::invalid_input(line, format!("value {} is not an integer", token)))?;
    let value = if negative { -value } else { value };
    i64::try_from(value)
        .map_err(|_| Error::invalid_input(line, format!("value {} is out of range", token)))
}

/// Interpret tokens as `<shape> (<name> = "<value>")*`
///
/// Returns shape keyword and the list of properties in the order of appearance.
pub fn parse_properties<'a>(
    tokens: &[&'a str],
    line: usize,
) -> Result<(&'a str, Vec<Property<'a>>), Error> {
    let (keyword, rest) = tokens
        .split_first()
        .ok_or(Error::InvalidLine { line })?;
    check_name(keyword, line)?;
    let mut properties = Vec::with_capacity(rest.len() / 3);
    for group in rest.chunks(3) {
        let name = group[0];
        check_name(name, line)?;
        match group {
            [_, "=", value] => properties.push(Property {
                name,
                value: parse_literal(value, property_radix(name), line)?,
            }),
            [_, "="] => {
                return Err(Error::invalid_input(
                    line,
                    format!("property {} is missing a value", name),
                ));
            }
            _ => {
                return Err(Error::invalid_input(
                    line,
                    format!("expected `=` after property {}", name),
                ));
            }
        }
    }
    Ok((keyword, properties))
}

/// Properties of a single line
struct Properties<'a> {
    shape: Shape,
    properties: Vec<Property<'a>>,
    line: usize,
}

impl Properties<'_> {
    // first property with matching name wins
    fn get(&self, name: &str) -> Result<i64, Error> {
        self.properties
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| prop.value)
            .ok_or_else(|| {
                Error::invalid_input(
                    self.line,
                    format!("{} requires property {}", self.shape, name),
                )
            })
    }

    fn coord(&self, name: &str) -> Result<i32, Error> {
        let value = self.get(name)?;
        i32::try_from(value).map_err(|_| {
            Error::invalid_input(
                self.line,
                format!("value {} of property {} is out of range", value, name),
            )
        })
    }

    fn color(&self) -> Result<RGB, Error> {
        let value = self.get("color")?;
        u32::try_from(value)
            .ok()
            .and_then(RGB::from_u32)
            .ok_or_else(|| {
                Error::invalid_input(self.line, format!("color {:x} is not a 24-bit color", value))
            })
    }
}

/// Build command of the shape named by `keyword` from its properties
pub fn build_command(
    keyword: &str,
    properties: Vec<Property<'_>>,
    line: usize,
) -> Result<Command, Error> {
    let shape = Shape::from_keyword(keyword)
        .ok_or_else(|| Error::invalid_input(line, format!("unknown shape {}", keyword)))?;
    let props = Properties {
        shape,
        properties,
        line,
    };
    for name in shape.properties() {
        props.get(name)?;
    }
    let id = props.get("id")?;
    let color = props.color()?;
    let command = match shape {
        Shape::Rectangle => Command::Rectangle(Rectangle {
            id,
            color,
            x: props.coord("x")?,
            y: props.coord("y")?,
            width: props.coord("width")?,
            height: props.coord("height")?,
        }),
        Shape::Circle => Command::Circle(Circle {
            id,
            color,
            x: props.coord("x")?,
            y: props.coord("y")?,
            radius: props.coord("radius")?,
        }),
        Shape::Triangle => Command::Triangle(Triangle {
            id,
            color,
            ax: props.coord("ax")?,
            ay: props.coord("ay")?,
            bx: props.coord("bx")?,
            by: props.coord("by")?,
            cx: props.coord("cx")?,
            cy: props.coord("cy")?,
        }),
    };
    Ok(command)
}

/// Parse single scene line, `line` is only used for error reporting
pub fn parse_line(text: &str, line: usize) -> Result<Command, Error> {
    let tokens = tokenize(text);
    let (keyword, properties) = parse_properties(&tokens, line)?;
    build_command(keyword, properties, line)
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_line(text, 1)
    }
}

/// Parser producing commands from a line oriented input
///
/// Commands are produced in the order of the input, see [`crate::Scene`]
/// for ordered and validated set of commands.
pub struct SceneParser<I> {
    input: I,
    buffer: Vec<u8>,
    line: usize,
}

impl<I: BufRead> SceneParser<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            buffer: Vec::new(),
            line: 0,
        }
    }

    /// Number of the last line read from the input
    pub fn line(&self) -> usize {
        self.line
    }

    /// Parse next command, `None` indicates end of input
    pub fn parse_cmd(&mut self) -> Result<Option<Command>, Error> {
        self.buffer.clear();
        if self.input.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let bytes = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::invalid_input(self.line, "entry is not valid UTF-8"))?;
        let command = parse_line(text, self.line)?;
        tracing::trace!("[parse:command] line={} {}", self.line, command);
        Ok(Some(command))
    }
}

impl<I: BufRead> Iterator for SceneParser<I> {
    type Item = Result<Command, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_cmd().transpose()
    }
}
