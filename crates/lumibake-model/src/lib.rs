//! Shared data structures for Lumibake.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCENE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFile {
    pub version: u32,
    #[serde(default)]
    pub spheres: Vec<SphereDef>,
    #[serde(default)]
    pub triangles: Vec<TriangleDef>,
    #[serde(default)]
    pub environment: EnvironmentDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SphereDef {
    pub center: [f32; 3],
    pub radius: f32,
    pub material: MaterialDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriangleDef {
    pub a: [f32; 3],
    pub b: [f32; 3],
    pub c: [f32; 3],
    pub material: MaterialDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialDef {
    pub albedo: [f32; 3],
    #[serde(default)]
    pub emission: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentDef {
    Off,
    Constant { radiance: [f32; 3] },
    Gradient { sky: [f32; 3], ground: [f32; 3] },
}

impl Default for EnvironmentDef {
    fn default() -> Self {
        EnvironmentDef::Gradient {
            sky: [0.6, 0.8, 1.0],
            ground: [0.05, 0.05, 0.07],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("unsupported scene version {0} (expected {SCENE_VERSION})")]
    Version(u32),
    #[error("sphere {index}: {reason}")]
    Sphere { index: usize, reason: String },
    #[error("triangle {index}: {reason}")]
    Triangle { index: usize, reason: String },
    #[error("environment: {0}")]
    Environment(String),
}

impl SceneFile {
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.version != SCENE_VERSION {
            return Err(SceneError::Version(self.version));
        }
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !finite3(sphere.center) {
                return Err(SceneError::Sphere {
                    index,
                    reason: "center is not finite".to_string(),
                });
            }
            if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
                return Err(SceneError::Sphere {
                    index,
                    reason: format!("radius {} is not positive", sphere.radius),
                });
            }
            if let Err(reason) = check_material(&sphere.material) {
                return Err(SceneError::Sphere { index, reason });
            }
        }
        for (index, triangle) in self.triangles.iter().enumerate() {
            if !finite3(triangle.a) || !finite3(triangle.b) || !finite3(triangle.c) {
                return Err(SceneError::Triangle {
                    index,
                    reason: "vertex is not finite".to_string(),
                });
            }
            if degenerate(triangle) {
                return Err(SceneError::Triangle {
                    index,
                    reason: "zero area".to_string(),
                });
            }
            if let Err(reason) = check_material(&triangle.material) {
                return Err(SceneError::Triangle { index, reason });
            }
        }
        match &self.environment {
            EnvironmentDef::Off => {}
            EnvironmentDef::Constant { radiance } => {
                if !finite3(*radiance) || radiance.iter().any(|c| *c < 0.0) {
                    return Err(SceneError::Environment(
                        "radiance must be finite and non-negative".to_string(),
                    ));
                }
            }
            EnvironmentDef::Gradient { sky, ground } => {
                for value in [sky, ground] {
                    if !finite3(*value) || value.iter().any(|c| *c < 0.0) {
                        return Err(SceneError::Environment(
                            "sky and ground must be finite and non-negative".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

fn finite3(value: [f32; 3]) -> bool {
    value.iter().all(|c| c.is_finite())
}

fn check_material(material: &MaterialDef) -> Result<(), String> {
    if !finite3(material.albedo) || material.albedo.iter().any(|c| *c < 0.0 || *c > 1.0) {
        return Err(format!("albedo {:?} outside [0, 1]", material.albedo));
    }
    if !finite3(material.emission) || material.emission.iter().any(|c| *c < 0.0) {
        return Err(format!(
            "emission {:?} must be finite and non-negative",
            material.emission
        ));
    }
    Ok(())
}

fn degenerate(triangle: &TriangleDef) -> bool {
    let e1 = sub3(triangle.b, triangle.a);
    let e2 = sub3(triangle.c, triangle.a);
    let cross = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    cross.iter().map(|c| c * c).sum::<f32>() == 0.0
}

fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}
