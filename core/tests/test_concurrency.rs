// One codec instance shared by many threads behind a mutex, and one
// instance per thread: both must round-trip and reset once per call.

#[cfg(test)]
mod tests {

    use std::sync::Mutex;
    use std::thread;

    use objio::codec::{BinaryCodec, TextCodec};
    use objio::config::CodecConfig;
    use objio::io::ObjectIo;

    const THREADS: usize = 8;
    const CALLS: usize = 25;

    fn assert_send<T: Send>() {}

    #[test]
    fn codecs_are_send() {
        assert_send::<TextCodec>();
        assert_send::<BinaryCodec>();
        assert_send::<ObjectIo<BinaryCodec>>();
    }

    #[test]
    fn shared_instance_behind_mutex() {
        let io = Mutex::new(ObjectIo::binary(CodecConfig::default()).unwrap());

        thread::scope(|s| {
            for t in 0..THREADS {
                let io = &io;
                s.spawn(move || {
                    for i in 0..CALLS {
                        let payload = vec![format!("t{t}"), format!("i{i}")];
                        let mut stream = Vec::new();
                        io.lock().unwrap().write(&payload, &mut stream).unwrap();
                        let back: Vec<String> = io.lock().unwrap().read(&mut stream.as_slice()).unwrap();
                        assert_eq!(back, payload);
                    }
                });
            }
        });

        let snap = io.lock().unwrap().counters();
        let calls = (THREADS * CALLS) as u64;
        assert_eq!(snap.documents_written, calls);
        assert_eq!(snap.documents_read, calls);
        assert_eq!(snap.session_resets, 2 * calls);
    }

    #[test]
    fn instance_per_thread() {
        let results: Vec<u64> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    s.spawn(move || {
                        let mut io = ObjectIo::text(CodecConfig::default()).unwrap();
                        let mut stream = Vec::new();
                        for i in 0..CALLS {
                            io.write(&(t as u64, i as u64), &mut stream).unwrap();
                        }
                        let mut input = stream.as_slice();
                        let mut sum = 0;
                        for i in 0..CALLS {
                            let (tt, ii): (u64, u64) = io.read(&mut input).unwrap();
                            assert_eq!((tt, ii), (t as u64, i as u64));
                            sum += ii;
                        }
                        sum
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let expected: u64 = (0..CALLS as u64).sum();
        assert!(results.iter().all(|&sum| sum == expected));
    }
}
