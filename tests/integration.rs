// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs hand-assembled programs through the public API
use chip8emu::*;

/// Builds a CPU that runs `rom` one instruction per frame
fn setup_environment(rom: &[u8]) -> (CPU, Keys) {
    let mut cpu = CPU::new(&Config {
        speed: 60,
        ..Default::default()
    });
    cpu.load_program_bytes(rom)
        .expect("Test programs should fit in memory");
    (cpu, Keys::new())
}

/// Ticks `steps` times, failing the test on any error
fn run(cpu: &mut CPU, keys: &Keys, steps: usize) {
    for _ in 0..steps {
        cpu.tick(keys).expect("Program should only contain valid instructions");
    }
}

mod memory {
    use super::*;

    #[test]
    fn read_write() {
        let mut mem = Mem::new();
        for addr in 0..MEM_SIZE {
            let byte = rand::random::<u8>();
            mem.write(addr, byte).unwrap();
            assert_eq!(byte, mem.read(addr).unwrap());
        }
        for addr in MEM_SIZE..MEM_SIZE + 0x10 {
            assert!(mem.read(addr).is_err());
            assert!(mem.write(addr, 0).is_err());
        }
    }

    #[test]
    fn fetch() {
        let (cpu, _) = setup_environment(&[0x12, 0x34]);
        assert_eq!(0x1234, cpu.mem().fetch(0x200).unwrap());
        assert_eq!(0, cpu.mem().fetch(MEM_SIZE - 2).unwrap());
        assert!(matches!(
            cpu.mem().fetch(MEM_SIZE - 1),
            Err(Error::InvalidAddressRange { .. })
        ));
    }

    #[test]
    fn font_is_loaded() {
        let cpu = CPU::default();
        assert_eq!(CHARSET, cpu.mem().get_region(Region::Charset));
    }

    #[test]
    fn rom_too_large() {
        let (mut cpu, _) = setup_environment(&[0x12, 0x00]);
        let rom = vec![0xaa; MEM_SIZE - PROGRAM_ADDR + 1];
        assert!(matches!(
            cpu.load_program_bytes(&rom),
            Err(Error::RomTooLarge { len, capacity }) if len == 0xe01 && capacity == 0xe00
        ));
        // The old program is untouched
        assert_eq!(0x1200, cpu.mem().fetch(0x200).unwrap());
    }

    #[test]
    fn largest_rom_fits() {
        let (mut cpu, _) = setup_environment(&[]);
        let rom = vec![0xaa; MEM_SIZE - PROGRAM_ADDR];
        cpu.load_program_bytes(&rom).unwrap();
        assert_eq!(0xaaaa, cpu.mem().fetch(MEM_SIZE - 2).unwrap());
    }

    #[test]
    fn missing_rom() {
        let mut cpu = CPU::default();
        assert!(matches!(
            cpu.load_program("this/rom/does/not/exist.ch8"),
            Err(Error::IoError(_))
        ));
    }
}

mod control_flow {
    use super::*;

    #[test]
    fn jump() {
        let (mut cpu, keys) = setup_environment(&[
            0x13, 0x00, // 200: jmp 300
        ]);
        run(&mut cpu, &keys, 1);
        // Memory at 300 is zeroed, so the next fetch there fails
        assert!(matches!(
            cpu.tick(&keys),
            Err(Error::UnimplementedInstruction { word: 0x0000 })
        ));
        assert_eq!(0x300, cpu.pc());
    }

    #[test]
    fn call_and_return() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x22, 0x06, // 200: call 206
            0x61, 0x01, // 202: mov #01, v1
            0x12, 0x04, // 204: jmp 204
            0x60, 0x07, // 206: mov #07, v0
            0x00, 0xee, // 208: ret
        ]);
        run(&mut cpu, &keys, 3);
        assert_eq!(0x202, cpu.pc());
        assert_eq!(0, cpu.sp());
        run(&mut cpu, &keys, 2);
        assert_eq!([0x07, 0x01], cpu.v()[0..2]);
        assert_eq!(0x204, cpu.pc());
    }

    #[test]
    fn stack_overflow() {
        // Calls itself forever
        let (mut cpu, keys) = setup_environment(&[0x22, 0x00]);
        run(&mut cpu, &keys, STACK_DEPTH);
        assert_eq!(STACK_DEPTH, cpu.stack().len());
        assert!(matches!(
            cpu.tick(&keys),
            Err(Error::StackOverflow { addr: 0x200 })
        ));
    }

    #[test]
    fn stack_underflow() {
        let (mut cpu, keys) = setup_environment(&[0x00, 0xee]);
        assert!(matches!(cpu.tick(&keys), Err(Error::StackUnderflow)));
    }

    #[test]
    fn unknown_instruction() {
        let (mut cpu, keys) = setup_environment(&[0xff, 0xff]);
        assert!(matches!(
            cpu.tick(&keys),
            Err(Error::UnimplementedInstruction { word: 0xffff })
        ));
    }

    #[test]
    fn jump_indexed() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x60, 0x04, // 200: mov #04, v0
            0xb2, 0x02, // 202: jmp $202+v0
            0x00, 0x00, // 204: (skipped)
            0x61, 0x42, // 206: mov #42, v1
        ]);
        run(&mut cpu, &keys, 3);
        assert_eq!(0x42, cpu.v()[1]);
    }
}

mod arithmetic {
    use super::*;

    /// Loads vX and vY, then runs `op` on them. Returns (vX, vF)
    fn alu(x: u8, y: u8, op: u8) -> (u8, u8) {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x6f, 0x55, // mov #55, vF
            0x61, x,    // mov x, v1
            0x62, y,    // mov y, v2
            0x81, 0x20 | op,
        ]);
        run(&mut cpu, &keys, 4);
        (cpu.v()[1], cpu.v()[0xf])
    }

    #[test]
    fn add_with_carry() {
        assert_eq!((0x00, 1), alu(0xff, 0x01, 0x4));
        assert_eq!((0x02, 0), alu(0x01, 0x01, 0x4));
    }

    #[test]
    fn sub_with_borrow() {
        assert_eq!((0x02, 1), alu(0x05, 0x03, 0x5));
        assert_eq!((0xfe, 0), alu(0x01, 0x03, 0x5));
        assert_eq!((0x00, 1), alu(0x03, 0x03, 0x5));
    }

    #[test]
    fn backwards_sub() {
        assert_eq!((0x02, 1), alu(0x03, 0x05, 0x7));
        assert_eq!((0xfe, 0), alu(0x03, 0x01, 0x7));
    }

    #[test]
    fn bitwise_clears_vf() {
        for op in [0x1, 0x2, 0x3] {
            for _ in 0..16 {
                let (x, y) = (rand::random(), rand::random());
                let (_, vf) = alu(x, y, op);
                assert_eq!(0, vf);
            }
        }
    }

    #[test]
    fn shifts_read_vy() {
        assert_eq!((0b0000_0001, 1), alu(0xff, 0b0000_0011, 0x6));
        assert_eq!((0b0000_0001, 0), alu(0xff, 0b0000_0010, 0x6));
        assert_eq!((0b0000_0110, 0), alu(0x00, 0b0000_0011, 0xe));
        assert_eq!((0b0000_0010, 1), alu(0x00, 0b1000_0001, 0xe));
    }

    #[test]
    fn vf_as_destination_keeps_flag() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x6f, 0xff, // mov #ff, vF
            0x61, 0x01, // mov #01, v1
            0x8f, 0x14, // add v1, vF
        ]);
        run(&mut cpu, &keys, 3);
        assert_eq!(1, cpu.v()[0xf]);
    }
}

mod memory_ops {
    use super::*;

    #[test]
    fn dma_increments_i_by_one() {
        for x in 0..16_u8 {
            #[rustfmt::skip]
            let (mut cpu, keys) = setup_environment(&[
                0xa3, 0x00,      // mov $300, I
                0xf0 | x, 0x55,  // dmao vX
                0xf0 | x, 0x65,  // dmai vX
            ]);
            run(&mut cpu, &keys, 2);
            assert_eq!(0x301, cpu.i());
            run(&mut cpu, &keys, 1);
            assert_eq!(0x302, cpu.i());
        }
    }

    #[test]
    fn bcd() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x63, 0x9c, // mov #9c, v3  (156)
            0xa3, 0x00, // mov $300, I
            0xf3, 0x33, // bcd v3, &I
            0xf2, 0x65, // dmai v2
        ]);
        run(&mut cpu, &keys, 4);
        assert_eq!([1, 5, 6], cpu.v()[0..3]);
    }

    #[test]
    fn font() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0x6a, 0x0b, // mov #0b, vA
            0xfa, 0x29, // font vA, I
            0x6a, 0x10, // mov #10, vA
            0xfa, 0x29, // font vA, I
        ]);
        run(&mut cpu, &keys, 2);
        assert_eq!(0xb * 5, cpu.i());
        run(&mut cpu, &keys, 1);
        assert!(matches!(
            cpu.tick(&keys),
            Err(Error::InvalidDigit { digit: 0x10 })
        ));
    }
}

mod screen {
    use super::*;

    /// Draws the 8x1 sprite `ff` at (vX, vY) = (`x`, `y`), twice
    #[rustfmt::skip]
    fn bar(x: u8, y: u8) -> Vec<u8> {
        vec![
            0xa2, 0x0e, // 200: mov $20e, I
            0x60, x,    // 202: mov x, v0
            0x61, y,    // 204: mov y, v1
            0xd0, 0x11, // 206: draw #1, v0, v1
            0x82, 0xf0, // 208: mov vF, v2
            0xd0, 0x11, // 20a: draw #1, v0, v1
            0x12, 0x0c, // 20c: jmp 20c
            0xff, 0x00, // 20e: sprite
        ]
    }

    #[test]
    fn draw_twice_erases() {
        let (mut cpu, keys) = setup_environment(&bar(10, 10));
        run(&mut cpu, &keys, 5);
        // First draw: nothing to collide with
        assert_eq!(0, cpu.v()[2]);
        assert!((10..18).all(|x| cpu.screen().pixel(x, 10)));
        run(&mut cpu, &keys, 1);
        assert_eq!(1, cpu.v()[0xf]);
        assert!(cpu.screen().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn wraps_right_edge() {
        let (mut cpu, keys) = setup_environment(&bar(60, 2));
        run(&mut cpu, &keys, 4);
        let screen = cpu.screen();
        for x in [60, 61, 62, 63, 0, 1, 2, 3] {
            assert!(screen.pixel(x, 2), "column {x} should be lit");
        }
        assert!(!screen.pixel(59, 2) && !screen.pixel(4, 2));
        // Nothing leaked onto the next row
        assert!(!(0..WIDTH).any(|x| screen.pixel(x, 3)));
    }

    #[test]
    fn clips_bottom_edge() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0xa2, 0x0a, // 200: mov $20a, I
            0x60, 0x00, // 202: mov #00, v0
            0x61, 0x1f, // 204: mov #1f, v1
            0xd0, 0x14, // 206: draw #4, v0, v1
            0x12, 0x08, // 208: jmp 208
            0x80, 0x80, // 20a: sprite
            0x80, 0x80,
        ]);
        run(&mut cpu, &keys, 4);
        let screen = cpu.screen();
        assert!(screen.pixel(0, 31));
        assert!(!screen.pixel(0, 0) && !screen.pixel(0, 1) && !screen.pixel(0, 2));
    }

    #[test]
    fn clear() {
        #[rustfmt::skip]
        let (mut cpu, keys) = setup_environment(&[
            0xd0, 0x05, // draw #5, v0, v0
            0x00, 0xe0, // cls
        ]);
        run(&mut cpu, &keys, 1);
        assert!(cpu.screen().as_bytes().iter().any(|&b| b != 0));
        run(&mut cpu, &keys, 1);
        assert_eq!(&Screen::new(), cpu.screen());
    }
}

mod keypad {
    use super::*;

    #[rustfmt::skip]
    const SKIPS: &[u8] = &[
        0x65, 0x0b, // 200: mov #0b, v5
        0xe5, 0x9e, // 202: sek v5
        0x61, 0x01, // 204: mov #01, v1
        0xe5, 0xa1, // 206: snek v5
        0x62, 0x01, // 208: mov #01, v2
        0x12, 0x0a, // 20a: jmp 20a
    ];

    #[test]
    fn skip_if_held() {
        let (mut cpu, mut keys) = setup_environment(SKIPS);
        keys.press(0xb).unwrap();
        run(&mut cpu, &keys, 4);
        // sek skipped `mov v1`; snek didn't skip `mov v2`
        assert_eq!([0, 1], cpu.v()[1..3]);
    }

    #[test]
    fn skip_if_not_held() {
        let (mut cpu, keys) = setup_environment(SKIPS);
        run(&mut cpu, &keys, 4);
        assert_eq!([1, 0], cpu.v()[1..3]);
    }

    #[test]
    fn invalid_key() {
        let (mut cpu, keys) = setup_environment(&[
            0x65, 0x10, // mov #10, v5
            0xe5, 0x9e, // sek v5
        ]);
        run(&mut cpu, &keys, 1);
        assert!(matches!(
            cpu.tick(&keys),
            Err(Error::InvalidKey { key: 0x10 })
        ));
    }

    #[test]
    fn wait_for_key() {
        let mut chip8 = Chip8::new(&Config {
            speed: 60 * 4,
            ..Default::default()
        });
        chip8
            .cpu
            .load_program_bytes(&[
                0xf4, 0x0a, // 200: waitk v4
                0x12, 0x02, // 202: jmp 202
            ])
            .unwrap();
        for _ in 0..3 {
            chip8.frame().unwrap();
            assert!(chip8.cpu.flags.is_awaiting_key());
        }
        // A key held from before doesn't count once it's settled
        chip8.keys.press(0x9).unwrap();
        chip8.keys.settle();
        chip8.frame().unwrap();
        assert!(chip8.cpu.flags.is_awaiting_key());
        // A fresh press does
        chip8.keys.press(0x6).unwrap();
        chip8.frame().unwrap();
        assert!(!chip8.cpu.flags.is_awaiting_key());
        assert_eq!(0x6, chip8.cpu.v()[4]);
    }
}

mod timing {
    use super::*;

    #[rustfmt::skip]
    const TIMERS: &[u8] = &[
        0x60, 0x03, // 200: mov #03, v0
        0xf0, 0x15, // 202: mov v0, DT
        0xf0, 0x18, // 204: mov v0, ST
        0x12, 0x06, // 206: jmp 206
    ];

    #[test]
    fn timers_tick_once_per_frame() {
        for speed in [60, 600, 6000] {
            let mut cpu = CPU::new(&Config {
                speed,
                ..Default::default()
            });
            cpu.load_program_bytes(TIMERS).unwrap();
            let keys = Keys::new();
            cpu.singlestep(&keys).unwrap();
            cpu.singlestep(&keys).unwrap();
            cpu.singlestep(&keys).unwrap();
            assert_eq!((3, 3), (cpu.delay(), cpu.sound()));
            cpu.frame(&keys).unwrap();
            assert_eq!((2, 2), (cpu.delay(), cpu.sound()));
        }
    }

    #[test]
    fn tone_stops_on_the_frame_it_reaches_zero() {
        let mut chip8 = Chip8::new(&Config {
            speed: 60 * 3,
            ..Default::default()
        });
        chip8.cpu.load_program_bytes(TIMERS).unwrap();
        let tones: Vec<Tone> = (0..5).map(|_| chip8.frame().unwrap()).collect();
        // ST is set to 3 during the first frame
        assert_eq!(
            [
                Tone::Playing,
                Tone::Playing,
                Tone::Stopping,
                Tone::Silent,
                Tone::Silent
            ],
            tones[..]
        );
    }

    #[test]
    fn speed_to_frames() {
        let config = Config {
            speed: 30,
            ..Default::default()
        };
        assert_eq!((1, 30), (config.instructions_per_frame(), config.frame_rate()));
        let config = Config::default();
        assert_eq!((14, 60), (config.instructions_per_frame(), config.frame_rate()));
    }

    #[test]
    fn pause_and_step() {
        let mut chip8 = Chip8::new(&Config {
            pause: true,
            ..Default::default()
        });
        chip8.cpu.load_program_bytes(TIMERS).unwrap();
        assert_eq!(Tone::Silent, chip8.frame().unwrap());
        assert_eq!(0x200, chip8.cpu.pc());
        chip8.singlestep().unwrap();
        assert_eq!(0x202, chip8.cpu.pc());
        assert!(chip8.cpu.flags.pause);
    }
}

mod diagnostics {
    use super::*;

    #[test]
    fn history_explains() {
        let mut cpu = CPU::new(&Config {
            explain: true,
            history: 2,
            ..Default::default()
        });
        #[rustfmt::skip]
        let rom = [
            0x63, 0x12, // mov #12, v3
            0x33, 0x12, // se #12, v3
            0x00, 0x00,
            0x12, 0x06, // jmp 206
        ];
        cpu.load_program_bytes(&rom).unwrap();
        let keys = Keys::new();
        for _ in 0..2 {
            cpu.tick(&keys).unwrap();
        }
        let lines: Vec<String> = cpu.history().iter().map(|e| e.description.clone()).collect();
        assert_eq!(["Set v3 to 0x12", "Skip next instruction if v3 == 0x12"], lines[..]);
        cpu.tick(&keys).unwrap();
        assert_eq!(2, cpu.history().len());
        assert_eq!(0x206, cpu.history().latest().unwrap().addr);
    }

    #[test]
    fn listing() {
        let lines = Dis::plain().listing(0x200, &[0x00, 0xe0, 0xff, 0xff, 0x12]);
        assert_eq!(3, lines.len());
        assert!(lines[0].starts_with("200: cls"));
        assert!(lines[1].contains("inval  ffff"));
        assert_eq!("204: 12", lines[2]);
    }
}
