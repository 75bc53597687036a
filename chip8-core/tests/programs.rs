use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_utils::thread;

use chip8_core::{Builder, Diagnostics, FrameView, Machine};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn formatted(frame: FrameView<'_>) -> String {
    frame
        .iter_rows_as_bitslices()
        .map(|row| {
            row.iter()
                .map(|&px| if px { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn top_left(frame: FrameView<'_>, width: usize, height: usize) -> Vec<String> {
    formatted(frame)
        .lines()
        .take(height)
        .map(|row| row[..width].to_string())
        .collect()
}

fn machine(program: &[u8]) -> Machine<Diagnostics> {
    Builder::new()
        .with_hooks(Diagnostics::new())
        .with_seed(0xC0FFEE)
        .with_program(program)
        .build()
        .unwrap()
}

fn run(chip: &mut Machine<Diagnostics>, steps: usize) {
    for _ in 0..steps {
        let _ = chip.step();
    }
}

#[test]
fn draws_font_glyph() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0x60, 0x07, // ld V0, 7
        0xF0, 0x29, // ld F, V0
        0x61, 0x01, // ld V1, 1
        0x62, 0x02, // ld V2, 2
        0xD1, 0x25, // drw V1, V2, 5
        0x12, 0x0A, // jp 0x20A
    ];
    let mut chip = machine(&program);
    run(&mut chip, 10);

    assert_eq!(chip.pc(), 0x20A);
    assert_eq!(chip.v(0xF), 0);
    assert_eq!(
        top_left(chip.frame(), 6, 8),
        vec![
            "......", "......", ".####.", "....#.", "...#..", "..#...", "..#...", "......",
        ],
    );
    assert_eq!(chip.hooks().unknown_opcodes, 0);
}

#[test]
fn bcd_roundtrips_through_memory() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0x60, 0x9D, // ld V0, 157
        0xA3, 0x00, // ld I, 0x300
        0xF0, 0x33, // ld B, V0
        0xF2, 0x65, // ld V2, [I]
        0x12, 0x08, // jp 0x208
    ];
    let mut chip = machine(&program);
    run(&mut chip, 5);

    assert_eq!((chip.v(0), chip.v(1), chip.v(2)), (1, 5, 7));
    assert_eq!((chip.peek(0x300), chip.peek(0x301), chip.peek(0x302)), (1, 5, 7));
    assert_eq!(chip.i(), 0x303);
}

#[test]
fn nested_calls_return_in_order() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0x22, 0x08, // call 0x208
        0x22, 0x08, // call 0x208
        0x12, 0x04, // jp 0x204
        0x00, 0x00,
        0x70, 0x01, // add V0, 1
        0x00, 0xEE, // ret
    ];
    let mut chip = machine(&program);
    run(&mut chip, 6);

    assert_eq!(chip.v(0), 2);
    assert_eq!(chip.pc(), 0x204);
    assert_eq!(chip.sp(), 0);
    assert_eq!(chip.hooks().stack_wraps, 0);
}

#[test]
fn delay_loop_waits_for_timer() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0x60, 0x03, // ld V0, 3
        0xF0, 0x15, // ld DT, V0
        0xF1, 0x07, // ld V1, DT
        0x31, 0x00, // se V1, 0
        0x12, 0x04, // jp 0x204
        0x62, 0x01, // ld V2, 1
        0x12, 0x0C, // jp 0x20C
    ];
    let mut chip = machine(&program);
    run(&mut chip, 50);
    assert_eq!(chip.v(2), 0);
    assert_eq!(chip.delay_timer(), 3);

    for _ in 0..3 {
        chip.tick_timers();
        run(&mut chip, 10);
    }
    assert_eq!(chip.v(2), 1);
    assert_eq!(chip.pc(), 0x20C);
}

#[test]
fn key_press_releases_wait() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0xF0, 0x0A, // ld V0, K
        0xF0, 0x29, // ld F, V0
        0xD1, 0x15, // drw V1, V1, 5
        0x12, 0x06, // jp 0x206
    ];
    let mut chip = machine(&program);
    run(&mut chip, 20);
    assert!(chip.is_waiting_for_key());
    assert!(chip.frame().is_blank());

    chip.set_key(0xC, true);
    run(&mut chip, 4);
    chip.set_keys([false; 16]);

    assert!(!chip.is_waiting_for_key());
    assert_eq!(
        top_left(chip.frame(), 4, 5),
        vec!["####", "#...", "#...", "#...", "####"],
    );
}

#[test]
fn garbage_is_reported_not_fatal() {
    init_logger();
    let program = [0xFF, 0xFF, 0x5A, 0xB1, 0x80, 0x08, 0x60, 0x2A];
    let mut chip = machine(&program);
    run(&mut chip, 4);

    assert_eq!(chip.v(0), 0x2A);
    assert_eq!(chip.hooks().unknown_opcodes, 3);
    assert_eq!(
        chip.hooks().first_unknown.iter().map(|&(addr, _)| addr).collect::<Vec<_>>(),
        vec![0x200, 0x202, 0x204],
    );
}

macro_rules! schedule_until {
    ($scope:expr, $f:expr, $freq:expr, $timeout:expr) => {{
        let started = Instant::now();
        let period = Duration::from_nanos(1_000_000_000u64 / $freq);
        $scope.spawn(move |_| {
            while Instant::now().duration_since(started) < $timeout {
                if $f() {
                    break;
                }
                std::thread::sleep(period);
            }
        })
    }};
}

#[test]
fn cpu_and_timers_on_separate_threads() {
    init_logger();
    #[rustfmt::skip]
    let program = [
        0x60, 0x05, // ld V0, 5
        0xF0, 0x15, // ld DT, V0
        0xF1, 0x07, // ld V1, DT
        0x31, 0x00, // se V1, 0
        0x12, 0x04, // jp 0x204
        0x62, 0x01, // ld V2, 1
        0x12, 0x0C, // jp 0x20C
    ];
    let chip = Arc::new(Mutex::new(machine(&program)));
    let chip_cpu = Arc::clone(&chip);
    let chip_timers = Arc::clone(&chip);
    let timeout = Duration::from_secs(5);

    thread::scope(|s| {
        schedule_until!(
            s,
            || {
                let mut chip = chip_cpu.lock().unwrap();
                let _ = chip.step();
                chip.v(2) == 1
            },
            500,
            timeout
        );
        schedule_until!(
            s,
            || {
                let mut chip = chip_timers.lock().unwrap();
                chip.tick_timers();
                chip.v(2) == 1
            },
            60,
            timeout
        );
    })
    .unwrap();

    let chip = chip.lock().unwrap();
    assert_eq!(chip.v(2), 1);
    assert_eq!(chip.delay_timer(), 0);
}
