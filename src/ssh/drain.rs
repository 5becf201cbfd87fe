//! Collect buffered terminal output

use std::io;

use tracing::debug;

use super::charset::Charset;
use super::transport::InputStream;

/// Read everything the input stream already holds and decode it
///
/// Only bytes that are available at call time are consumed; the function
/// never waits for more to arrive.
pub async fn drain_output(input: &mut dyn InputStream, charset: Charset) -> io::Result<String> {
    let mut collected = Vec::new();

    loop {
        let available = input.available().await?;
        if available == 0 {
            break;
        }
        let mut buffer = vec![0u8; available];
        let len = input.read(&mut buffer).await?;
        if len == 0 {
            break;
        }
        collected.extend_from_slice(&buffer[..len]);
    }

    debug!("Drained {} bytes of terminal output", collected.len());
    Ok(charset.decode(&collected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::mock::MockTransport;
    use crate::ssh::transport::OutputStream;

    #[tokio::test]
    async fn test_drain_empty_returns_immediately() {
        let mut input = MockTransport::new();
        let output = drain_output(&mut input, Charset::utf8()).await.unwrap();
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_drain_takes_everything_buffered() {
        let mut stream = MockTransport::new()
            .respond("ls", "a.txt\n")
            .respond("pwd", "/data\n");
        stream.write_all(b"ls\rpwd\r").await.unwrap();

        let output = drain_output(&mut stream, Charset::utf8()).await.unwrap();

        assert_eq!(output, "a.txt\n/data\n");
        assert_eq!(drain_output(&mut stream, Charset::utf8()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_drain_decodes_with_charset() {
        let mut stream =
            MockTransport::new().respond("cat gbk.txt", vec![0xD6_u8, 0xD0, 0xCE, 0xC4]);
        stream.write_all(b"cat gbk.txt\r").await.unwrap();

        let gbk = Charset::for_label("GBK").unwrap();
        let output = drain_output(&mut stream, gbk).await.unwrap();

        assert_eq!(output, "中文");
    }
}
