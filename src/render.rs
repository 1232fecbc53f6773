use crate::Field2;

/// RGB triples, one per padded cell, row-major.
pub fn density_to_rgb(density: &Field2, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(density.data().len() * 3);
    for value in density.data() {
        let d = value.clamp(0.0, 1.0);
        out.extend_from_slice(&[
            to_byte(0.9 * (1.0 - d)),
            to_byte(0.9 * (1.0 - d * d)),
            to_byte(0.9 * (1.0 - d * d * d)),
        ]);
    }
}

/// Speed heat map: dark red for slow cells, bright orange for fast ones.
pub fn velocity_to_rgb(u: &Field2, v: &Field2, velocity_scale: f32, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(u.data().len() * 3);
    for (du, dv) in u.data().iter().zip(v.data()) {
        let len = 20.0 * (du * du + dv * dv).sqrt() / velocity_scale;
        let vmag = remap(len, 0.0, 5.0, 0.1, 1.0).clamp(0.0, 1.0);
        let hue = remap(vmag, 0.0, 1.0, 0.0, 0.025);
        let saturation = remap(vmag, 0.0, 1.0, 1.0, 0.9);
        let [r, g, b] = hsb_to_rgb(hue, saturation, vmag);
        out.extend_from_slice(&[to_byte(r), to_byte(g), to_byte(b)]);
    }
}

/// `dst = dst * (1 - alpha) + src * alpha`, channel-wise.
pub fn blend_into(dst: &mut [u8], src: &[u8], alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for (d, s) in dst.iter_mut().zip(src) {
        let mixed = *d as f32 * (1.0 - alpha) + *s as f32 * alpha;
        *d = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    to_lo + (value - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [f32; 3] {
    if saturation <= 0.0 {
        return [brightness; 3];
    }
    let h = (hue - hue.floor()) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));
    match sector as u32 {
        0 => [brightness, t, p],
        1 => [q, brightness, p],
        2 => [p, brightness, t],
        3 => [p, q, brightness],
        4 => [t, p, brightness],
        _ => [brightness, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid2;

    #[test]
    fn density_colormap_endpoints() {
        let grid = Grid2::new(1, 1, 1.0);
        let mut field = Field2::new(grid, 0.0);
        field.set(1, 1, 1.0);
        field.set(0, 0, 7.0);
        field.set(2, 2, -3.0);
        let mut rgb = Vec::new();
        density_to_rgb(&field, &mut rgb);
        assert_eq!(rgb.len(), 9 * 3);
        let px = |i: usize, j: usize| {
            let n = (i + 3 * j) * 3;
            [rgb[n], rgb[n + 1], rgb[n + 2]]
        };
        assert_eq!(px(1, 1), [0, 0, 0]);
        assert_eq!(px(0, 0), [0, 0, 0]);
        assert_eq!(px(2, 2), [229, 229, 229]);
        assert_eq!(px(1, 0), [229, 229, 229]);
    }

    #[test]
    fn velocity_colormap_brightens_with_speed() {
        let grid = Grid2::new(2, 1, 1.0);
        let u = Field2::from_fn(grid, |i, _j| if i == 2 { 1.0 } else { 0.0 });
        let v = Field2::new(grid, 0.0);
        let mut rgb = Vec::new();
        velocity_to_rgb(&u, &v, 0.75, &mut rgb);
        let still = rgb[(1 + 4) * 3];
        let fast = rgb[(2 + 4) * 3];
        assert!(fast > still, "fast {fast} still {still}");
        assert_eq!(fast, 255);
    }

    #[test]
    fn hsb_primary_hues() {
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        assert_eq!(hsb_to_rgb(0.5, 0.0, 0.25), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn blend_mixes_channels() {
        let mut dst = vec![0, 100, 200];
        blend_into(&mut dst, &[200, 100, 0], 0.5);
        assert_eq!(dst, vec![100, 100, 100]);
    }
}
