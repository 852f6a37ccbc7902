use crate::{Canvas, Command, Draw, Error, RGB, Rectangle, SceneParser, bmp, draw_command};
use std::{fmt, io::BufRead, str::FromStr};

/// Set of commands ordered by their identifiers
///
/// Identifiers are unique, commands are drawn in ascending order of their
/// identifiers regardless of the order they were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    commands: Vec<Command>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert command at the position defined by its identifier
    ///
    /// Returns index of inserted command. Fails with [`Error::DuplicateIdentifier`]
    /// (with `line` set to `0`) leaving scene unchanged if identifier is already used.
    pub fn insert(&mut self, command: Command) -> Result<usize, Error> {
        let id = command.id();
        let mut index = 0;
        for other in self.commands.iter() {
            if id < other.id() {
                break;
            } else if id == other.id() {
                return Err(Error::DuplicateIdentifier { line: 0, id });
            }
            index += 1;
        }
        self.commands.insert(index, command);
        Ok(index)
    }

    /// Load scene, one command per line
    ///
    /// Stops at the first invalid line, empty input produces empty scene.
    pub fn read(input: impl BufRead) -> Result<Self, Error> {
        let _span = tracing::debug_span!("[parse]").entered();
        let mut scene = Scene::new();
        let mut parser = SceneParser::new(input);
        while let Some(command) = parser.parse_cmd()? {
            scene
                .insert(command)
                .map_err(|error| error.at_line(parser.line()))?;
        }
        tracing::debug!("[parse:commands_count] {}", scene.len());
        Ok(scene)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    /// Find command by its identifier
    pub fn get(&self, id: i64) -> Option<&Command> {
        let index = self
            .commands
            .binary_search_by_key(&id, |cmd| cmd.id())
            .ok()?;
        self.commands.get(index)
    }

    /// Render scene on top of `background` colored canvas of the given size
    pub fn render(&self, width: usize, height: usize, background: RGB) -> Result<Canvas, Error> {
        let _span = tracing::debug_span!("[render]", width, height).entered();
        // reject images that can not be encoded before allocating them
        bmp::header(width, height)?;
        let (Ok(width_i32), Ok(height_i32)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(Error::ImageTooLarge { width, height });
        };
        let mut canvas = Canvas::new(width, height)?;
        let background = Rectangle {
            id: 0,
            color: background,
            x: 0,
            y: 0,
            width: width_i32,
            height: height_i32,
        };
        background.draw(&mut canvas);
        self.draw(&mut canvas);
        Ok(canvas)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Draw for Scene {
    fn draw(&self, canvas: &mut Canvas) {
        for command in self.commands.iter() {
            draw_command(canvas, command);
        }
    }
}

impl TryFrom<Vec<Command>> for Scene {
    type Error = Error;

    fn try_from(commands: Vec<Command>) -> Result<Self, Self::Error> {
        let mut scene = Scene::new();
        for command in commands {
            scene.insert(command)?;
        }
        Ok(scene)
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl FromStr for Scene {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Scene::read(text.as_bytes())
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in self.commands.iter() {
            writeln!(f, "{}", command)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scene {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.commands.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Scene {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let commands = Vec::<Command>::deserialize(deserializer)?;
        Scene::try_from(commands).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circle, Triangle};

    const RED: RGB = RGB::new(255, 0, 0);
    const GREEN: RGB = RGB::new(0, 255, 0);

    const EXAMPLE: &str = r#"rectangle id="1" color="ff0000" x="0" y="0" width="2" height="2"
circle id="2" color="00ff00" x="5" y="5" radius="1"
"#;

    fn circle(id: i64) -> Command {
        Circle {
            id,
            color: GREEN,
            x: 0,
            y: 0,
            radius: 1,
        }
        .into()
    }

    fn ids(scene: &Scene) -> Vec<i64> {
        scene.iter().map(|cmd| cmd.id()).collect()
    }

    #[test]
    fn test_insert_ordered() -> Result<(), Error> {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.insert(circle(5))?, 0);
        assert_eq!(scene.insert(circle(1))?, 0);
        assert_eq!(scene.insert(circle(9))?, 2);
        assert_eq!(scene.insert(circle(-3))?, 0);
        assert_eq!(scene.insert(circle(7))?, 3);
        assert_eq!(ids(&scene), [-3, 1, 5, 7, 9]);
        assert_eq!(scene.get(7), Some(&circle(7)));
        assert_eq!(scene.get(6), None);

        // pseudo random insertion orders
        let mut state: u32 = 1;
        for count in 0..32 {
            let mut pending: Vec<i64> = (0..count).map(|id| id * 3 - 20).collect();
            let mut scene = Scene::new();
            while !pending.is_empty() {
                state = state.wrapping_mul(214_013).wrapping_add(2_531_011) & 0x7fffffff;
                let id = pending.swap_remove((state >> 16) as usize % pending.len());
                scene.insert(circle(id))?;
            }
            let ids = ids(&scene);
            assert_eq!(ids.len(), count as usize);
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }
        Ok(())
    }

    #[test]
    fn test_insert_duplicate() -> Result<(), Error> {
        let mut scene: Scene = vec![circle(1), circle(2), circle(3)].try_into()?;
        for id in [1, 2, 3] {
            match scene.insert(circle(id)) {
                Err(Error::DuplicateIdentifier { id: dup, .. }) => assert_eq!(dup, id),
                result => panic!("unexpected result: {:?}", result),
            }
            assert_eq!(scene.len(), 3);
        }
        assert_eq!(ids(&scene), [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_read() -> Result<(), Error> {
        let scene: Scene = EXAMPLE.parse()?;
        assert_eq!(ids(&scene), [1, 2]);

        // lines are reordered by id
        let reversed: String = EXAMPLE.lines().rev().map(|line| format!("{}\n", line)).collect();
        assert_eq!(reversed.parse::<Scene>()?, scene);

        // trailing new line is optional
        assert_eq!(EXAMPLE.trim_end().parse::<Scene>()?, scene);

        // empty file is an empty scene
        assert!("".parse::<Scene>()?.is_empty());

        // display produces parsable scene
        assert_eq!(scene.to_string().parse::<Scene>()?, scene);
        Ok(())
    }

    #[test]
    fn test_read_errors() {
        let text = format!("{}rectangle id=1\n", EXAMPLE);
        assert!(matches!(
            text.parse::<Scene>(),
            Err(Error::InvalidInput { line: 3, .. })
        ));

        let text = format!("{}\n{}", EXAMPLE, EXAMPLE);
        assert!(matches!(
            text.parse::<Scene>(),
            Err(Error::InvalidLine { line: 3 })
        ));

        let text = format!(
            "{}triangle id=\"1\" color=\"ff\" ax=\"0\" ay=\"0\" bx=\"1\" by=\"1\" cx=\"0\" cy=\"1\"",
            EXAMPLE
        );
        match text.parse::<Scene>() {
            Err(Error::DuplicateIdentifier { line, id }) => {
                assert_eq!(line, 3);
                assert_eq!(id, 1);
            }
            result => panic!("unexpected result: {:?}", result),
        }
    }

    #[test]
    fn test_render_example() -> Result<(), Error> {
        let scene: Scene = EXAMPLE.parse()?;
        let canvas = scene.render(10, 10, RGB::WHITE)?;
        for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(canvas.get_pixel(col, row), Some(RED));
        }
        assert_eq!(canvas.get_pixel(2, 0), Some(RGB::WHITE));
        assert_eq!(canvas.get_pixel(5, 5), Some(GREEN));
        assert_eq!(canvas.get_pixel(9, 9), Some(RGB::WHITE));
        Ok(())
    }

    #[test]
    fn test_render_white() -> Result<(), Error> {
        // width of 4 pixels has no row padding
        let canvas = Scene::new().render(4, 3, RGB::WHITE)?;
        assert_eq!(canvas.data().len(), bmp::row_stride(4) * 3);
        assert!(canvas.data().iter().all(|byte| *byte == 0xff));

        // padding stays zero
        let canvas = Scene::new().render(3, 2, RGB::WHITE)?;
        for row in canvas.data().chunks(canvas.row_stride()) {
            assert_eq!(row, [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0]);
        }
        Ok(())
    }

    #[test]
    fn test_render_too_large() -> Result<(), Error> {
        let scene: Scene = EXAMPLE.parse()?;
        for (width, height) in [(1 << 31, 1), (1, 1 << 31), (100_000, 100_000)] {
            match scene.render(width, height, RGB::WHITE) {
                Err(Error::ImageTooLarge { width: w, height: h }) => {
                    assert_eq!((w, h), (width, height));
                }
                result => panic!("unexpected result: {:?}", result),
            }
        }
        Ok(())
    }

    #[test]
    fn test_render_order() -> Result<(), Error> {
        // higher identifiers are drawn on top
        let mut scene = Scene::new();
        scene.insert(
            Triangle {
                id: 2,
                color: RED,
                ax: 0,
                ay: 0,
                bx: 8,
                by: 0,
                cx: 0,
                cy: 8,
            }
            .into(),
        )?;
        scene.insert(
            Rectangle {
                id: 1,
                color: GREEN,
                x: 0,
                y: 0,
                width: 8,
                height: 8,
            }
            .into(),
        )?;
        let canvas = scene.render(8, 8, RGB::BLACK)?;
        assert_eq!(canvas.get_pixel(0, 0), Some(RED));
        assert_eq!(canvas.get_pixel(7, 7), Some(GREEN));

        let mut out = Vec::new();
        canvas.write_bmp(&mut out)?;
        assert_eq!(out.len(), bmp::file_size(8, 8));
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json() -> Result<(), Error> {
        let scene: Scene = EXAMPLE.parse()?;
        let json = scene.to_json()?;
        assert!(json.contains("\"shape\": \"circle\""));
        assert!(json.contains("\"color\": \"#ff0000\""));
        assert_eq!(Scene::from_json(&json)?, scene);

        let json = r##"[
            {"shape": "circle", "id": 2, "color": "#00ff00", "x": 1, "y": 1, "radius": 1},
            {"shape": "circle", "id": 2, "color": "#00ff00", "x": 3, "y": 3, "radius": 1}
        ]"##;
        assert!(matches!(Scene::from_json(json), Err(Error::Json(_))));
        Ok(())
    }
}
