use std::io::{self, Read};

/// Reads until `buf` is full or the reader hits EOF, returning the number of bytes read.
pub(crate) fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut len = 0;

    while len < buf.len() {
        match reader.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;

            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
            }

            match (self.data.first(), buf.first_mut()) {
                (Some(&b), Some(slot)) => {
                    *slot = b;
                    self.data = &self.data[1..];
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn fill_gathers_short_reads() {
        let mut reader = Trickle {
            data: &[1, 2, 3, 4, 5, 6],
            interrupt: false,
        };
        let mut buf = [0; 4];

        assert_eq!(fill(&mut reader, &mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(fill(&mut reader, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[5, 6]);
        assert_eq!(fill(&mut reader, &mut buf).unwrap(), 0);
    }
}
