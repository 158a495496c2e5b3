use itertools::Itertools;

use crate::errors::{Error, Result};

/// Raspberry Pi 40-pin header, indexed by physical pin number.
///
/// Index 0 does not exist on the header. Power, ground and pins reserved for
/// I2C1, UART0 and SPI0 have no entry.
pub const RASPBERRY_PI_HEADER: [Option<u32>; 41] = [
    None,     // no pin 0
    None,     // 1, 3V3
    None,     // 2, 5V
    None,     // 3, I2C1 SDA
    None,     // 4, 5V
    None,     // 5, I2C1 SCL
    None,     // 6, GND
    Some(4),  // 7, GPCLK0
    None,     // 8, UART TX
    None,     // 9, GND
    None,     // 10, UART RX
    Some(17), // 11
    Some(18), // 12, PCM CLK
    Some(27), // 13
    None,     // 14, GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17, 3V3
    Some(24), // 18
    None,     // 19, SPI0 MOSI
    None,     // 20, GND
    None,     // 21, SPI0 MISO
    Some(25), // 22
    None,     // 23, SPI0 SCLK
    None,     // 24, SPI0 CE0
    None,     // 25, GND
    None,     // 26, SPI0 CE1
    Some(0),  // 27, EEPROM SDA
    Some(1),  // 28, EEPROM SCL
    Some(5),  // 29
    None,     // 30, GND
    Some(6),  // 31
    Some(12), // 32, PWM0
    Some(13), // 33, PWM1
    None,     // 34, GND
    Some(19), // 35, PCM FS
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38, PCM DIN
    None,     // 39, GND
    Some(21), // 40, PCM DOUT
];

/// Maps logical pin indices to kernel GPIO numbers.
///
/// Indices run contiguously from 0. An empty entry marks a logical pin with
/// no controllable GPIO behind it; every access to such a pin fails without
/// touching the OS. No kernel GPIO number appears twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTable {
    entries: Box<[Option<u32>]>,
}

impl PinTable {
    pub fn new(entries: impl IntoIterator<Item = Option<u32>>) -> Result<Self> {
        let entries: Box<[Option<u32>]> = entries.into_iter().collect();

        if let Some(gpio) = entries.iter().flatten().copied().duplicates().next() {
            if let Some((first, second)) = entries
                .iter()
                .positions(|e| *e == Some(gpio))
                .next_tuple()
            {
                return Err(Error::DuplicateGpio {
                    gpio,
                    first,
                    second,
                });
            }
        }

        Ok(Self { entries })
    }

    /// The header layout of the Raspberry Pi 40-pin boards
    pub fn raspberry_pi() -> Self {
        Self {
            entries: RASPBERRY_PI_HEADER.into(),
        }
    }

    /// Look up the kernel GPIO number behind a logical pin
    #[inline]
    pub fn resolve(&self, pin: usize) -> Result<u32> {
        match self.entries.get(pin) {
            Some(Some(gpio)) => Ok(*gpio),
            Some(None) => Err(Error::NotControllable(pin)),
            None => Err(Error::OutOfRange(pin)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(pin, gpio)` for every controllable pin
    pub fn usable(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(pin, gpio)| Some((pin, (*gpio)?)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve() {
        let table = PinTable::new([None, Some(4), Some(17)]).unwrap();

        assert_eq!(table.len(), 3);
        assert!(matches!(table.resolve(0), Err(Error::NotControllable(0))));
        assert_eq!(table.resolve(1).unwrap(), 4);
        assert_eq!(table.resolve(2).unwrap(), 17);
        assert!(matches!(table.resolve(3), Err(Error::OutOfRange(3))));
    }

    #[test]
    fn duplicate_gpio() {
        let err = PinTable::new([Some(4), None, Some(17), Some(4)]).unwrap_err();

        assert!(matches!(
            err,
            Error::DuplicateGpio {
                gpio: 4,
                first: 0,
                second: 3
            }
        ));
    }

    #[test]
    fn raspberry_pi_header() {
        let table = PinTable::raspberry_pi();

        assert_eq!(table.len(), 41);
        assert!(PinTable::new(RASPBERRY_PI_HEADER).is_ok());
        assert_eq!(table.resolve(7).unwrap(), 4);
        assert_eq!(table.resolve(40).unwrap(), 21);
        assert!(matches!(table.resolve(1), Err(Error::NotControllable(1))));
        assert!(matches!(table.resolve(41), Err(Error::OutOfRange(41))));
        assert_eq!(table.usable().count(), 19);
    }

    #[test]
    fn empty() {
        let table = PinTable::new(std::iter::empty::<Option<u32>>()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.usable().count(), 0);
    }
}
