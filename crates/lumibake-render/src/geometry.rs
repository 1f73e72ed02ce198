use crate::math::{Ray, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub emission: Vec3,
}

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub albedo: Vec3,
    pub emission: Vec3,
}

impl Sphere {
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let half_b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let mut root = (-half_b - sqrt_d) / a;
        if root < t_min || root > t_max {
            root = (-half_b + sqrt_d) / a;
            if root < t_min || root > t_max {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = (point - self.center) / self.radius;
        Some(Hit {
            t: root,
            point,
            normal,
            albedo: self.albedo,
            emission: self.emission,
        })
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        (self.center - r, self.center + r)
    }

    pub fn centroid(&self) -> Vec3 {
        self.center
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub albedo: Vec3,
    pub emission: Vec3,
}

impl Triangle {
    // The shading normal always faces the incoming ray.
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let p = ray.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }

        let inv_det = 1.0 / det;
        let tv = ray.origin - self.a;
        let u = tv.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = tv.cross(e1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        if t < t_min || t > t_max {
            return None;
        }

        let mut normal = e1.cross(e2).normalized();
        if normal.dot(ray.direction) > 0.0 {
            normal = normal * -1.0;
        }

        Some(Hit {
            t,
            point: ray.at(t),
            normal,
            albedo: self.albedo,
            emission: self.emission,
        })
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.a.min(self.b).min(self.c), self.a.max(self.b).max(self.c))
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }
}

#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl Primitive {
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, t_min, t_max),
            Primitive::Triangle(triangle) => triangle.hit(ray, t_min, t_max),
        }
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        match self {
            Primitive::Sphere(sphere) => sphere.bounds(),
            Primitive::Triangle(triangle) => triangle.bounds(),
        }
    }

    pub fn centroid(&self) -> Vec3 {
        match self {
            Primitive::Sphere(sphere) => sphere.centroid(),
            Primitive::Triangle(triangle) => triangle.centroid(),
        }
    }
}
