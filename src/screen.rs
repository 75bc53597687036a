use chip8_core::{FrameView, HEIGHT, WIDTH};

const LIT: char = '#';
const DARK: char = '.';

/// Render a frame as ASCII art, every pixel repeated `scale` times both ways
pub fn render(frame: FrameView<'_>, scale: usize) -> String {
    let mut out = String::with_capacity((WIDTH * scale + 1) * HEIGHT * scale);
    for row in frame.iter_pixelwise_scaled(scale) {
        out.extend(row.map(|&px| if px { LIT } else { DARK }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8_core::Builder;

    #[test]
    fn blank_frame() {
        let machine = Builder::new().with_seed(0).with_program(&[]).build().unwrap();
        let out = render(machine.frame(), 1);
        assert_eq!(out.lines().count(), HEIGHT);
        assert!(out.lines().all(|row| row.len() == WIDTH && !row.contains(LIT)));
    }

    #[test]
    fn scaled_pixel() {
        // ld I, 0x206; drw V0, V0, 1; jp 0x204; sprite 0x80
        let program = [0xA2, 0x06, 0xD0, 0x01, 0x12, 0x04, 0x80];
        let mut machine = Builder::new().with_seed(0).with_program(&program).build().unwrap();
        machine.step().unwrap();
        machine.step().unwrap();

        let out = render(machine.frame(), 2);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows.len(), HEIGHT * 2);
        assert!(rows[0].starts_with("##.."));
        assert!(rows[1].starts_with("##.."));
        assert!(rows[2].starts_with("...."));
        assert_eq!(rows[0].len(), WIDTH * 2);
    }
}
