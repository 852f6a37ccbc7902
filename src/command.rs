//! Drawing commands a scene is made of
use crate::RGB;
use std::fmt;

/// Shape kind of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Rectangle,
    Circle,
    Triangle,
}

impl Shape {
    /// Keyword that starts a scene line describing this shape
    pub fn keyword(self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "rectangle" => Some(Shape::Rectangle),
            "circle" => Some(Shape::Circle),
            "triangle" => Some(Shape::Triangle),
            _ => None,
        }
    }

    /// Properties that must be present on a line describing this shape
    pub fn properties(self) -> &'static [&'static str] {
        match self {
            Shape::Rectangle => &["id", "color", "x", "y", "width", "height"],
            Shape::Circle => &["id", "color", "x", "y", "radius"],
            Shape::Triangle => &["id", "color", "ax", "ay", "bx", "by", "cx", "cy"],
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Axis aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    pub id: i64,
    pub color: RGB,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Circle centered at `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub id: i64,
    pub color: RGB,
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

/// Triangle with vertices `a`, `b` and `c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub id: i64,
    pub color: RGB,
    pub ax: i32,
    pub ay: i32,
    pub bx: i32,
    pub by: i32,
    pub cx: i32,
    pub cy: i32,
}

impl Triangle {
    pub fn vertices(&self) -> [(i32, i32); 3] {
        [(self.ax, self.ay), (self.bx, self.by), (self.cx, self.cy)]
    }
}

/// Single drawing command
///
/// Formats as the scene line it can be parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "shape", rename_all = "lowercase")
)]
pub enum Command {
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
}

impl Command {
    pub fn id(&self) -> i64 {
        match self {
            Command::Rectangle(rect) => rect.id,
            Command::Circle(circle) => circle.id,
            Command::Triangle(triangle) => triangle.id,
        }
    }

    pub fn color(&self) -> RGB {
        match self {
            Command::Rectangle(rect) => rect.color,
            Command::Circle(circle) => circle.color,
            Command::Triangle(triangle) => triangle.color,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Command::Rectangle(_) => Shape::Rectangle,
            Command::Circle(_) => Shape::Circle,
            Command::Triangle(_) => Shape::Triangle,
        }
    }
}

impl From<Rectangle> for Command {
    fn from(rect: Rectangle) -> Self {
        Command::Rectangle(rect)
    }
}

impl From<Circle> for Command {
    fn from(circle: Circle) -> Self {
        Command::Circle(circle)
    }
}

impl From<Triangle> for Command {
    fn from(triangle: Triangle) -> Self {
        Command::Triangle(triangle)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} id=\"{}\" color=\"{:06x}\"",
            self.shape(),
            self.id(),
            self.color().to_u32()
        )?;
        match self {
            Command::Rectangle(rect) => write!(
                f,
                " x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                rect.x, rect.y, rect.width, rect.height
            ),
            Command::Circle(circle) => write!(
                f,
                " x=\"{}\" y=\"{}\" radius=\"{}\"",
                circle.x, circle.y, circle.radius
            ),
            Command::Triangle(triangle) => {
                for ((x, y), name) in triangle.vertices().into_iter().zip(["a", "b", "c"]) {
                    write!(f, " {name}x=\"{x}\" {name}y=\"{y}\"")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_keyword() {
        for shape in [Shape::Rectangle, Shape::Circle, Shape::Triangle] {
            assert_eq!(Shape::from_keyword(shape.keyword()), Some(shape));
            assert_eq!(shape.properties()[..2], ["id", "color"]);
        }
        assert_eq!(Shape::from_keyword("square"), None);
    }

    #[test]
    fn test_display() {
        let triangle = Command::from(Triangle {
            id: 3,
            color: RGB::new(0, 0, 255),
            ax: 0,
            ay: -1,
            bx: 2,
            by: 3,
            cx: 4,
            cy: 5,
        });
        assert_eq!(
            triangle.to_string(),
            r#"triangle id="3" color="0000ff" ax="0" ay="-1" bx="2" by="3" cx="4" cy="5""#
        );
        assert_eq!(triangle.shape(), Shape::Triangle);

        let circle = Command::from(Circle {
            id: -7,
            color: RGB::new(0x12, 0x34, 0x56),
            x: 5,
            y: 6,
            radius: 2,
        });
        assert_eq!(
            circle.to_string(),
            r#"circle id="-7" color="123456" x="5" y="6" radius="2""#
        );
        assert_eq!(circle.id(), -7);
    }
}
