use crate::math::Vec3;

#[derive(Debug, Clone)]
pub struct Film {
    width: u32,
    height: u32,
    supersample: u32,
    // rgb plus accumulated weight per fine bin.
    bins: Vec<[f32; 4]>,
}

impl Film {
    pub fn new(width: u32, height: u32, supersample: u32) -> Self {
        let supersample = supersample.max(1);
        let bins = (width * supersample) as usize * (height * supersample) as usize;
        Self {
            width,
            height,
            supersample,
            bins: vec![[0.0; 4]; bins],
        }
    }

    pub fn fine_width(&self) -> u32 {
        self.width * self.supersample
    }

    pub fn fine_height(&self) -> u32 {
        self.height * self.supersample
    }

    pub fn put(&mut self, x: u32, y: u32, value: Vec3) {
        let fine_width = self.fine_width();
        if x >= fine_width || y >= self.fine_height() {
            return;
        }
        let bin = &mut self.bins[(y * fine_width + x) as usize];
        bin[0] += value.x;
        bin[1] += value.y;
        bin[2] += value.z;
        bin[3] += 1.0;
    }

    pub fn develop(&self) -> FilmImage {
        let mut data = Vec::with_capacity((self.width * self.height) as usize * 3);
        let fine_width = self.fine_width() as usize;
        let s = self.supersample as usize;

        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                let mut sum = [0.0f32; 4];
                for sy in 0..s {
                    for sx in 0..s {
                        let idx = (y * s + sy) * fine_width + x * s + sx;
                        let bin = &self.bins[idx];
                        sum[0] += bin[0];
                        sum[1] += bin[1];
                        sum[2] += bin[2];
                        sum[3] += bin[3];
                    }
                }
                if sum[3] > 0.0 {
                    data.push(sum[0] / sum[3]);
                    data.push(sum[1] / sum[3]);
                    data.push(sum[2] / sum[3]);
                } else {
                    data.extend_from_slice(&[0.0, 0.0, 0.0]);
                }
            }
        }

        FilmImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

// Row-major, three floats per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl FilmImage {
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}
