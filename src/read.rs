//! Bounded reading of an upload stream.

use Error;
use std::io::Read;

const PORTION_SIZE: usize = 1024;

/// Reads a stream to its end in portions, refusing to go past `limit`
/// bytes. Once the limit is crossed `Error::TooBig` is returned.
pub fn load_data<R: Read>(stream: &mut R, limit: usize) -> Result<Vec<u8>, Error> {
    let mut result = Vec::new();
    let mut portion = [0u8; PORTION_SIZE];
    loop {
        let size = stream.read(&mut portion)?;
        if size == 0 {
            return Ok(result);
        }
        if result.len() + size > limit {
            return Err(Error::TooBig);
        }
        result.extend_from_slice(&portion[..size]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_everything_under_the_limit() {
        let data = vec![42u8; 3000];
        let mut stream = Cursor::new(data.clone());
        assert_eq!(data, load_data(&mut stream, 3000).unwrap());
    }

    #[test]
    fn rejects_streams_past_the_limit() {
        let mut stream = Cursor::new(vec![42u8; 3000]);
        match load_data(&mut stream, 2999) {
            Err(Error::TooBig) => {}
            x => panic!("Expected TooBig, got {:?}", x),
        }
    }
}
