use crate::bvh::Bvh;
use crate::geometry::{Hit, Primitive, Sphere, Triangle};
use crate::math::{Ray, Vec3, RAY_EPSILON};
use lumibake_model::{EnvironmentDef, SceneError, SceneFile};

#[derive(Debug, Clone, Copy)]
enum Environment {
    Off,
    Constant(Vec3),
    Gradient { sky: Vec3, ground: Vec3 },
}

pub struct Scene {
    bvh: Bvh,
    environment: Environment,
}

impl Scene {
    pub fn build(file: &SceneFile) -> Result<Scene, SceneError> {
        file.validate()?;

        let mut primitives = Vec::with_capacity(file.spheres.len() + file.triangles.len());
        for def in &file.spheres {
            primitives.push(Primitive::Sphere(Sphere {
                center: Vec3::from_array(def.center),
                radius: def.radius,
                albedo: Vec3::from_array(def.material.albedo),
                emission: Vec3::from_array(def.material.emission),
            }));
        }
        for def in &file.triangles {
            primitives.push(Primitive::Triangle(Triangle {
                a: Vec3::from_array(def.a),
                b: Vec3::from_array(def.b),
                c: Vec3::from_array(def.c),
                albedo: Vec3::from_array(def.material.albedo),
                emission: Vec3::from_array(def.material.emission),
            }));
        }

        let environment = match &file.environment {
            EnvironmentDef::Off => Environment::Off,
            EnvironmentDef::Constant { radiance } => {
                Environment::Constant(Vec3::from_array(*radiance))
            }
            EnvironmentDef::Gradient { sky, ground } => Environment::Gradient {
                sky: Vec3::from_array(*sky),
                ground: Vec3::from_array(*ground),
            },
        };

        Ok(Scene {
            bvh: Bvh::new(primitives),
            environment,
        })
    }

    pub fn hit(&self, ray: &Ray) -> Option<Hit> {
        self.bvh.hit(ray, RAY_EPSILON, f32::INFINITY)
    }

    // Expects a normalized ray direction.
    pub fn environment_radiance(&self, ray: &Ray) -> Vec3 {
        match self.environment {
            Environment::Off => Vec3::zero(),
            Environment::Constant(radiance) => radiance,
            Environment::Gradient { sky, ground } => {
                let t = 0.5 * (ray.direction.y + 1.0);
                ground * (1.0 - t) + sky * t
            }
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.bvh.primitives().len()
    }
}
