use bit_pack::{Backend, BitOrder, BitPackError, pack, packed_len, try_pack, unpack};

fn main() -> Result<(), BitPackError> {
    env_logger::init();

    println!("=== bit_pack examples ===\n");
    println!("Active backend: {}\n", Backend::active().name());

    example_sensor_samples();
    example_big_endian_fields()?;
    example_checked_errors();

    Ok(())
}

fn example_sensor_samples() {
    println!("Example 1: 12-bit sensor samples");

    let samples: Vec<u16> = (0..10_000u32).map(|i| ((i * 31) % 4096) as u16).collect();
    let mut packed = vec![0u8; packed_len(samples.len(), 12, 0)];
    pack(&samples, 12, &mut packed, 0, BitOrder::Little);

    let mut restored = vec![0u16; samples.len()];
    unpack(&packed, 0, 12, &mut restored, BitOrder::Little);
    assert_eq!(restored, samples);

    println!("  {} samples", samples.len());
    println!("  natural: {} bytes", samples.len() * 2);
    println!("  packed:  {} bytes", packed.len());
    println!();
}

fn example_big_endian_fields() -> Result<(), BitPackError> {
    println!("Example 2: big-endian 5-bit fields after a 3-bit tag");

    let mut frame = vec![0u8; packed_len(8, 5, 3)];
    frame[0] = 0b1010_0000; // tag 0b101 in the top three bits
    let written = try_pack(&[1u8, 2, 3, 4, 5, 6, 7, 31], 5, &mut frame, 3, BitOrder::Big)?;

    println!("  wrote {} bytes: {:02x?}", written, frame);
    println!("  tag kept: {:#05b}", frame[0] >> 5);
    println!();
    Ok(())
}

fn example_checked_errors() {
    println!("Example 3: validation errors");

    let mut dst = [0u8; 1];
    match try_pack(&[300u16], 8, &mut dst, 0, BitOrder::Little) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {e}"),
    }
    match try_pack(&[1u16, 2, 3], 4, &mut dst, 0, BitOrder::Little) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {e}"),
    }
}
