//! The fixed list of celestial bodies. Loaded once at startup and read-only after.

use anyhow::{bail, Result};
use glam::Vec3;
use std::collections::HashSet;

/// A clickable body in the solar system.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub description: String,
    /// Start position; bodies with an orbit begin on +X of their center.
    pub position: Vec3,
    pub orbit_radius: f32,
    /// Radians per second about +Y.
    pub orbit_speed: f32,
    /// Body this one orbits instead of the origin.
    pub parent: Option<String>,
    /// Radius of the stand-in sphere when the model is unavailable.
    pub display_radius: f32,
    /// Uniform scale applied to the glTF model.
    pub model_scale: f32,
    pub color: [f32; 4],
    /// Model path relative to the asset directory.
    pub model_path: String,
}

impl CelestialBody {
    fn new(
        name: &str,
        orbit_radius: f32,
        orbit_speed: f32,
        display_radius: f32,
        model_scale: f32,
        color: [f32; 4],
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            position: Vec3::new(orbit_radius, 0.0, 0.0),
            orbit_radius,
            orbit_speed,
            parent: None,
            display_radius,
            model_scale,
            color,
            model_path: format!("models/{}.glb", name.to_lowercase()),
        }
    }

    fn orbiting(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn has_orbit(&self) -> bool {
        self.orbit_radius > 0.0
    }
}

/// Read-only body list with unique names.
#[derive(Debug, Clone)]
pub struct BodyCatalog {
    bodies: Vec<CelestialBody>,
}

impl BodyCatalog {
    /// Validate and wrap a body list. Names must be unique and every parent
    /// must appear before its children.
    pub fn new(bodies: Vec<CelestialBody>) -> Result<Self> {
        let mut seen = HashSet::new();
        for body in &bodies {
            if let Some(parent) = &body.parent {
                if !seen.contains(parent.as_str()) {
                    bail!("{} orbits unknown or later body {}", body.name, parent);
                }
            }
            if !seen.insert(body.name.as_str()) {
                bail!("duplicate body name {}", body.name);
            }
        }
        Ok(Self { bodies })
    }

    /// The Sun, the eight planets, and the Moon.
    pub fn solar_system() -> Result<Self> {
        Self::new(solar_system_bodies())
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }
}

fn rgb(hex: u32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

fn solar_system_bodies() -> Vec<CelestialBody> {
    vec![
        CelestialBody::new(
            "Sun", 0.0, 0.0, 5.0, 5.0, rgb(0xFDB813),
            "The star at the center of our solar system. A huge, extremely hot ball of hydrogen and \
             helium about 1.4 million kilometres across, its light and heat make life on Earth possible.",
        ),
        CelestialBody::new(
            "Mercury", 25.0, 0.48, 0.8, 0.02, rgb(0xE5E5E5),
            "The smallest planet and the closest to the Sun. Its cratered surface swings from 430°C \
             by day to -180°C at night, and with almost no atmosphere its sky is always dark. It \
             circles the Sun in just 88 Earth days.",
        ),
        CelestialBody::new(
            "Venus", 38.0, 0.35, 1.5, 0.05, rgb(0xDEB887),
            "Often called Earth's twin for its size, Venus is hotter than Mercury at around 470°C. \
             A thick toxic atmosphere of carbon dioxide and sulfuric acid clouds hides the surface, \
             and it spins slowly in the opposite direction to most planets.",
        ),
        CelestialBody::new(
            "Earth", 52.0, 0.3, 1.6, 0.06, rgb(0x2E8BC0),
            "Our home and the only planet known to host life. Earth has an oxygen-rich atmosphere, \
             liquid water and mild temperatures. Its single natural satellite, the Moon, drives the \
             ocean tides.",
        ),
        CelestialBody::new(
            "Mars", 65.0, 0.24, 1.0, 0.04, rgb(0xCD5C5C),
            "The red planet, coloured by iron-rich dust. Mars has the tallest volcano in the solar \
             system, Olympus Mons, and the giant canyon Valles Marineris. It averages -60°C and has \
             two small moons, Phobos and Deimos.",
        ),
        CelestialBody::new(
            "Jupiter", 85.0, 0.13, 4.0, 0.11, rgb(0xDEB887),
            "The largest planet, a gas giant of hydrogen and helium. Its Great Red Spot is a storm \
             that has raged for centuries. Jupiter has faint rings and dozens of moons, including \
             Ganymede, the largest moon in the solar system.",
        ),
        CelestialBody::new(
            "Saturn", 105.0, 0.09, 3.5, 22.0, rgb(0xF4D03F),
            "The sixth planet, famous for its rings of ice and rock. Saturn is a pale yellow gas \
             giant with more than 80 moons, among them Titan with its thick atmosphere.",
        ),
        CelestialBody::new(
            "Uranus", 125.0, 0.05, 2.5, 0.01, rgb(0xB2FFFF),
            "A blue-green ice giant tinted by methane. Uranus is tipped over by almost 98 degrees, \
             so it appears to roll around the Sun. It has thin rings, 27 known moons and \
             temperatures near -224°C.",
        ),
        CelestialBody::new(
            "Neptune", 145.0, 0.04, 2.4, 0.06, rgb(0x5D8AA8),
            "The eighth and most distant planet, deep blue from atmospheric methane. Neptune has the \
             fastest winds in the solar system, up to 2,100 km/h, and its moon Triton orbits \
             backwards.",
        ),
        CelestialBody::new(
            "Moon", 10.0, 0.8, 0.5, 0.02, rgb(0xFFFFFF),
            "Earth's only natural satellite. Its surface is covered in impact craters, highlands and \
             dry basins called maria. With no atmosphere its temperatures are extreme, and it was the \
             first world beyond Earth visited by people.",
        )
        .orbiting("Earth"),
    ]
}
