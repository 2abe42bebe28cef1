// (c) Roel Kluin, 2023, GPL v3

#[cfg(test)]
mod tests {
    use clap::Parser;
    use overlapper::engine::MinimizerEngine;
    use overlapper::overlap::Strand;
    use overlapper::overlaps::{overlaps, OverlapsCmd};
    use overlapper::sequence::{Sequence, SequenceIds};
    use overlapper::sketch::sketch;
    use overlapper::thread_pool::ThreadPool;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::fs;
    use std::io::Write;
    use std::sync::Arc;

    const K: u32 = 15;

    fn random_dna(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
    }

    fn engine() -> MinimizerEngine {
        MinimizerEngine::new(15, 5, Arc::new(ThreadPool::new(4).unwrap())).unwrap()
    }

    fn near(got: u32, expected: u32) -> bool {
        got.abs_diff(expected) <= K
    }

    /// two 500 base sequences sharing 200 bases at [50, 250) and [100, 300).
    fn shared_pair(ids: &mut SequenceIds) -> (Arc<Sequence>, Arc<Sequence>) {
        let mut rng = StdRng::seed_from_u64(40164);
        let shared = random_dna(&mut rng, 200);
        let mut s1 = random_dna(&mut rng, 500);
        let mut s2 = random_dna(&mut rng, 500);
        s1[50..250].copy_from_slice(&shared);
        s2[100..300].copy_from_slice(&shared);
        (Arc::new(ids.create("seq1", s1)), Arc::new(ids.create("seq2", s2)))
    }

    #[test]
    fn test_shared_substring() {
        let mut ids = SequenceIds::new();
        let (s1, s2) = shared_pair(&mut ids);
        let mut engine = engine();
        engine.minimize(&[s1.clone()]).unwrap();

        let found = engine.map(&s2, true, false, None).unwrap();
        assert_eq!(found.len(), 1, "{found:?}");
        let o = found[0];
        assert_eq!(o.t_id, s1.id);
        assert_eq!(o.strand, Strand::Forward);
        assert!(near(o.t_begin, 50) && near(o.t_end, 250), "{o}");
        assert!(near(o.q_begin, 100) && near(o.q_end, 300), "{o}");
    }

    #[test]
    fn test_lookup_round_trip() {
        let mut ids = SequenceIds::new();
        let (s1, s2) = shared_pair(&mut ids);
        let mut engine = engine();
        let all = [s1.clone(), s2.clone()];
        engine.minimize(&all).unwrap();
        let k = engine.kmer_const().kmerlen;

        for seq in all.iter() {
            for m in sketch(engine.kmer_const(), seq, None).unwrap() {
                let occ = engine.index().lookup(m.value);
                assert!(!occ.is_empty());
                for o in occ {
                    // every occurrence decodes to a k-mer of that value, on either strand.
                    let owner = all.iter().find(|s| s.id == o.loc.id()).unwrap();
                    let end = o.loc.pos() as usize;
                    let kmer = &owner.data[end + 1 - k..=end];
                    let again = Sequence::new(owner.id, "kmer", kmer.to_vec());
                    let one = sketch(engine.kmer_const(), &again, None).unwrap();
                    assert_eq!(one.len(), 1);
                    assert_eq!(one[0].value, o.value);
                    assert_eq!(one[0].loc.is_reverse(), o.loc.is_reverse());
                }
            }
        }
    }

    #[test]
    fn test_filter_bounds() {
        let mut ids = SequenceIds::new();
        let (s1, s2) = shared_pair(&mut ids);
        let mut engine = engine();
        engine.minimize(&[s1.clone(), s2.clone()]).unwrap();
        let before = engine.map(&s2, true, false, None).unwrap();

        engine.filter(0.0).unwrap();
        assert_eq!(engine.map(&s2, true, false, None).unwrap(), before);

        engine.filter(1.0).unwrap();
        for m in sketch(engine.kmer_const(), &s1, None).unwrap() {
            assert!(engine.index().lookup(m.value).is_empty());
        }
        assert!(engine.map(&s2, true, false, None).unwrap().is_empty());
        assert!(engine.filter(-0.5).is_err());
    }

    #[test]
    fn test_no_self_overlap() {
        let mut ids = SequenceIds::new();
        let (s1, s2) = shared_pair(&mut ids);
        let mut engine = engine();
        let all = [s1, s2];
        engine.minimize(&all).unwrap();
        for seq in all.iter() {
            for diagonal in [true, false] {
                let found = engine.map(seq, diagonal, false, None).unwrap();
                assert!(found.iter().all(|o| o.t_id != seq.id));
            }
        }
    }

    #[test]
    fn test_triangle_reports_once() {
        let mut rng = StdRng::seed_from_u64(5);
        let shared = random_dna(&mut rng, 300);
        let mut a = random_dna(&mut rng, 800);
        let mut b = random_dna(&mut rng, 800);
        a[400..700].copy_from_slice(&shared);
        b[50..350].copy_from_slice(&shared);
        let all = [Arc::new(Sequence::new(2, "A", a)), Arc::new(Sequence::new(5, "B", b))];
        let mut engine = engine();
        engine.minimize(&all).unwrap();

        let both = engine.map_batch(&all, true, false, None).unwrap();
        assert_eq!(both.iter().map(Vec::len).sum::<usize>(), 2);

        let once = engine.map_batch(&all, true, true, None).unwrap();
        assert!(once[0].is_empty());
        assert_eq!(once[1].len(), 1);
        assert_eq!(once[1][0].t_id, 2);
    }

    #[test]
    fn test_reverse_complement_overlap() {
        let mut rng = StdRng::seed_from_u64(6);
        let t = random_dna(&mut rng, 1200);
        let rc: Vec<u8> = t[200..800]
            .iter()
            .rev()
            .map(|&c| match c {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();
        let mut ids = SequenceIds::new();
        let target = Arc::new(ids.create("t", t));
        let query = Arc::new(ids.create("q", rc));
        let mut engine = engine();
        engine.minimize(&[target.clone()]).unwrap();

        let found = engine.map(&query, true, false, None).unwrap();
        assert_eq!(found.len(), 1, "{found:?}");
        assert_eq!(found[0].strand, Strand::Reverse);
        assert!(near(found[0].t_begin, 200) && near(found[0].t_end, 800));
        assert!(near(found[0].q_begin, 0) && near(found[0].q_end, 600));
    }

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        cmd: OverlapsCmd,
    }

    #[test]
    fn test_all_against_all_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = dir.path().join("reads.fa");
        let tsv = dir.path().join("overlaps.tsv");
        {
            let mut ids = SequenceIds::new();
            let (s1, s2) = shared_pair(&mut ids);
            let mut f = fs::File::create(&fasta).unwrap();
            for s in [s1, s2] {
                writeln!(f, ">{}", s.name).unwrap();
                f.write_all(&s.data).unwrap();
                writeln!(f).unwrap();
            }
        }
        let cli = Cli::try_parse_from([
            "overlaps",
            "-t",
            fasta.to_str().unwrap(),
            "-o",
            tsv.to_str().unwrap(),
            "-f",
            "0",
            "-c",
            "2",
        ])
        .unwrap();
        overlaps(cli.cmd).unwrap();

        let out = fs::read_to_string(&tsv).unwrap();
        let rows: Vec<Vec<&str>> = out.lines().map(|l| l.split('\t').collect()).collect();
        // the targets against themselves: one direction only.
        assert_eq!(rows.len(), 1, "{out}");
        assert_eq!(rows[0].len(), 9);
        assert_eq!((rows[0][0], rows[0][1], rows[0][4], rows[0][5], rows[0][6]), ("seq2", "500", "+", "seq1", "500"));
        let q_begin: u32 = rows[0][2].parse().unwrap();
        let t_begin: u32 = rows[0][7].parse().unwrap();
        assert!(near(q_begin, 100) && near(t_begin, 50));
    }
}
