/// Advance the `CXNN` generator.
///
/// The generator mixes a byte of program memory, picked by the low seed
/// byte inside the page of the current PC, with the high seed byte, then
/// adds the result rotated right by one. The new seed keeps the low byte
/// and takes the result as its high byte. Returns `(value, seed)`.
pub(super) fn feedback(seed: u16, pc: u16, memory: &[u8]) -> (u8, u16) {
    let next = seed.wrapping_add(1);
    let lo = next & 0x00FF;
    let addr = usize::from((pc & 0xFF00) | lo) % memory.len();

    let mixed = memory[addr].wrapping_add((next >> 8) as u8);
    let value = mixed.wrapping_add(mixed.rotate_right(1));

    (value, (u16::from(value) << 8) | lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixes_memory_byte_and_seed() {
        let mut memory = vec![0u8; 0x1000];
        memory[0x212] = 0x40;

        // next = 0x0312, page 0x200 -> byte 0x40; 0x40 + 0x03 = 0x43;
        // 0x43 ror 1 = 0xA1; 0x43 + 0xA1 = 0xE4.
        let (value, seed) = feedback(0x0311, 0x0234, &memory);
        assert_eq!(value, 0xE4);
        assert_eq!(seed, 0xE412);
    }

    #[test]
    fn same_inputs_same_sequence() {
        let memory: Vec<u8> = (0..=255u8).cycle().take(0x1000).collect();
        let run = |mut seed: u16| {
            (0..8)
                .map(|_| {
                    let (value, next) = feedback(seed, 0x0300, &memory);
                    seed = next;
                    value
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(0x1234), run(0x1234));
        assert_ne!(run(0x1234), run(0x4321));
    }

    #[test]
    fn address_wraps_inside_small_memory() {
        let memory = vec![0x01u8; 0x250];
        // Page 0x200 | 0xFF lies past the end and wraps.
        let (value, _) = feedback(0x00FE, 0x0240, &memory);
        assert_eq!(value, 0x01u8.wrapping_add(0x01u8.rotate_right(1)));
    }
}
