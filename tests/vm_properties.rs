use std::time::{Duration, Instant};

use chip8_vm::u4;
use chip8_vm::vm::{Chip8, Chip8Error, StepOutcome};

fn machine(program: &[u8]) -> (Chip8, Instant) {
    let start = Instant::now();
    let mut chip = Chip8::new();
    chip.reset_at(start);
    chip.load_program(program).unwrap();
    (chip, start)
}

fn steps(chip: &mut Chip8, now: Instant, count: usize) {
    for _ in 0..count {
        chip.step_at(now).unwrap();
    }
}

#[test]
fn clear_display_blanks_every_pixel() {
    // LD F, V0; DRW V0, V0, 5; DRW V1, V1, 5 (V1 = 0x20); CLS
    let (mut chip, now) = machine(&[
        0xF0, 0x29, 0xD0, 0x05, 0x61, 0x20, 0xD1, 0x15, 0x00, 0xE0,
    ]);

    steps(&mut chip, now, 4);
    assert!(chip.read_framebuffer().iter().flatten().any(|p| *p));

    steps(&mut chip, now, 1);
    assert!(chip.read_framebuffer().iter().flatten().all(|p| !*p));
}

#[test]
fn jump_lands_exactly_on_target() {
    let (mut chip, now) = machine(&[0x13, 0x00]);
    steps(&mut chip, now, 1);
    assert_eq!(chip.pc(), 0x300);
}

#[test]
fn call_then_return_resumes_after_the_call() {
    let mut program = vec![0u8; 0x206];
    program[0x000..0x002].copy_from_slice(&[0x24, 0x00]); // 0x200: CALL 0x400
    program[0x200..0x206].copy_from_slice(&[0x60, 0x01, 0x61, 0x02, 0x00, 0xEE]); // 0x400
    let (mut chip, now) = machine(&program);

    steps(&mut chip, now, 4);

    assert_eq!(chip.pc(), 0x202);
    assert!(chip.stack().is_empty());
    assert_eq!(&chip.v()[0..2], &[1, 2]);
}

#[test]
fn add_carries_into_vf() {
    let (mut chip, now) = machine(&[0x60, 0xFF, 0x61, 0x01, 0x80, 0x14]);
    steps(&mut chip, now, 3);
    assert_eq!(chip.v()[0], 0x00);
    assert_eq!(chip.v()[0xF], 1);
}

#[test]
fn sub_clears_vf_on_borrow() {
    let (mut chip, now) = machine(&[0x60, 0x01, 0x61, 0x02, 0x80, 0x15]);
    steps(&mut chip, now, 3);
    assert_eq!(chip.v()[0], 0xFF);
    assert_eq!(chip.v()[0xF], 0);
}

#[test]
fn redrawing_a_sprite_collides_and_erases() {
    let mut program = vec![0u8; 0x101];
    // I = 0x300; DRW V0, V0, 1; DRW V0, V0, 1
    program[0..6].copy_from_slice(&[0xA3, 0x00, 0xD0, 0x01, 0xD0, 0x01]);
    program[0x100] = 0xFF;
    let (mut chip, now) = machine(&program);

    steps(&mut chip, now, 2);
    assert_eq!(chip.v()[0xF], 0);

    assert_eq!(chip.step_at(now), Ok(StepOutcome::Drew));
    assert_eq!(chip.v()[0xF], 1);
    assert!(chip.read_framebuffer()[0].iter().all(|p| !*p));
}

#[test]
fn bcd_of_234() {
    let (mut chip, now) = machine(&[0x60, 234, 0xA3, 0x00, 0xF0, 0x33]);
    steps(&mut chip, now, 3);
    assert_eq!(&chip.memory().as_slice()[0x300..0x303], &[2, 3, 4]);
}

#[test]
fn timers_follow_wall_clock_not_step_count() {
    // V0 = 60; DT = V0; ST = V0; loop forever
    let (mut chip, start) = machine(&[0x60, 60, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06]);

    for ms in 0..1000 {
        chip.step_at(start + Duration::from_millis(ms)).unwrap();
    }

    let delay_ticks = 60 - chip.delay_timer();
    assert!(delay_ticks <= 60);
    assert!(delay_ticks >= 50, "only {delay_ticks} ticks in one second");
    assert_eq!(chip.delay_timer(), chip.sound_timer());
}

#[test]
fn timers_do_not_speed_up_with_more_steps() {
    // V0 = 0xC8; DT = V0; loop forever
    let (mut chip, start) = machine(&[0x60, 0xC8, 0xF0, 0x15, 0x12, 0x04]);

    for step in 0..10_000u64 {
        chip.step_at(start + Duration::from_micros(step * 100)).unwrap();
    }

    let ticks = 0xC8 - chip.delay_timer();
    assert!(ticks <= 60, "{ticks} ticks in one second");
}

#[test]
fn key_wait_freezes_pc_until_a_press() {
    // LD V5, K; LD V0, 1
    let (mut chip, now) = machine(&[0xF5, 0x0A, 0x60, 0x01]);

    assert_eq!(chip.step_at(now), Ok(StepOutcome::AwaitingKey));
    for _ in 0..10 {
        chip.step_at(now).unwrap();
        assert_eq!(chip.pc(), 0x202);
    }

    chip.set_key(u4::new(0xC), true);
    chip.step_at(now).unwrap();
    assert_eq!(chip.v()[5], 0xC);

    chip.step_at(now).unwrap();
    assert_eq!(chip.pc(), 0x204);
    assert_eq!(chip.v()[0], 1);
}

#[test]
fn unknown_opcode_is_reported_after_pc_advances() {
    let (mut chip, now) = machine(&[0x5A, 0xB1]);
    assert_eq!(
        chip.step_at(now),
        Err(Chip8Error::UnknownOpcode {
            opcode: 0x5AB1,
            address: 0x200
        })
    );
    assert_eq!(chip.pc(), 0x202);
}

#[test]
fn oversized_program_is_rejected() {
    let mut chip = Chip8::new();
    assert_eq!(
        chip.load_program(&vec![0; 4096 - 0x200 + 1]),
        Err(Chip8Error::ProgramTooLarge {
            size: 3585,
            max_size: 3584
        })
    );
}
