use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use jbig2_pdf_optimizer::{
    optimize_pdf, ConfigError, EncodeError, EncodedChunk, Jbig2Encoder, OptimizeError,
    OptimizeOutcome, Optimizer, Settings,
};

/// Stands in for jbig2enc: each fragment is the submitted PBM file itself,
/// and the dictionary names the chunk directory.
#[derive(Default, Clone)]
struct FakeEncoder {
    chunk_sizes: Rc<RefCell<Vec<usize>>>,
    fail: bool,
}

impl Jbig2Encoder for FakeEncoder {
    fn encode(
        &self,
        _threshold: f32,
        rasters: &[PathBuf],
        workdir: &Path,
        on_progress: &mut dyn FnMut(),
    ) -> Result<EncodedChunk, EncodeError> {
        assert!(workdir.is_dir());
        self.chunk_sizes.borrow_mut().push(rasters.len());
        if self.fail {
            return Err(EncodeError::MissingArtifact(workdir.join("output.sym")));
        }

        let mut fragments = Vec::new();
        for raster in rasters {
            let pbm = fs::read(raster)?;
            assert!(pbm.starts_with(b"P4\n"));
            fragments.push(pbm);
            on_progress();
        }
        let name = workdir.file_name().unwrap().to_string_lossy().into_owned();
        Ok(EncodedChunk {
            globals: format!("SYMBOLS {name}").into_bytes(),
            fragments,
        })
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    input: PathBuf,
    output: PathBuf,
    eligible: Vec<ObjectId>,
    ineligible: Vec<ObjectId>,
}

fn one_bit_image(index: usize) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 16,
            "Height" => 4,
            "BitsPerComponent" => 1,
            "ColorSpace" => "DeviceGray",
        },
        vec![(index as u8) ^ 0x0F; 8],
    )
}

fn gray_image() -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 4,
            "Height" => 4,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceGray",
        },
        vec![0x80; 16],
    )
}

fn inverted_image() -> Stream {
    let mut stream = one_bit_image(0);
    stream
        .dict
        .set("Decode", vec![Object::Integer(1), Object::Integer(0)]);
    stream
}

/// A PDF with one page per image
fn build_pdf(one_bit: usize, with_ineligible: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut eligible = Vec::new();
    let mut ineligible = Vec::new();
    let mut images = Vec::new();
    for i in 0..one_bit {
        let id = doc.add_object(one_bit_image(i));
        eligible.push(id);
        images.push(id);
        if with_ineligible && i == 0 {
            for stream in [gray_image(), inverted_image()] {
                let id = doc.add_object(stream);
                ineligible.push(id);
                images.push(id);
            }
        }
    }
    if one_bit == 0 && with_ineligible {
        let id = doc.add_object(gray_image());
        ineligible.push(id);
        images.push(id);
    }

    let mut kids = Vec::new();
    for image_id in images {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            b"q 612 0 0 792 0 0 cm /Im0 Do Q".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let input = dir.path().join("scan.pdf");
    doc.save(&input).unwrap();
    let output = dir.path().join("scan.opt.pdf");

    Fixture {
        _dir: dir,
        input,
        output,
        eligible,
        ineligible,
    }
}

fn test_settings(chunk_size: usize) -> Settings {
    Settings {
        threshold: 0.85,
        chunk_size,
        linearize: false,
        show_progress: false,
        ..Default::default()
    }
}

fn stream<'a>(doc: &'a Document, id: ObjectId) -> &'a Stream {
    doc.get_object(id).unwrap().as_stream().unwrap()
}

fn globals_ref(doc: &Document, id: ObjectId) -> ObjectId {
    stream(doc, id)
        .dict
        .get(b"DecodeParms")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"JBIG2Globals")
        .unwrap()
        .as_reference()
        .unwrap()
}

fn is_jbig2(doc: &Document, id: ObjectId) -> bool {
    matches!(stream(doc, id).dict.get(b"Filter"), Ok(Object::Name(n)) if n == b"JBIG2Decode")
}

#[test]
fn test_recompresses_one_bit_images() {
    let fixture = build_pdf(5, true);
    let encoder = FakeEncoder::default();
    let chunk_sizes = encoder.chunk_sizes.clone();

    let outcome = Optimizer::new(test_settings(2), encoder)
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    let OptimizeOutcome::Optimized(summary) = outcome else {
        panic!("expected images to be optimized");
    };
    assert_eq!(summary.records.len(), 5);
    assert_eq!(summary.chunk_count, 3);
    assert_eq!(*chunk_sizes.borrow(), vec![2, 2, 1]);

    // Discovery order is object order
    let ids: Vec<_> = summary.records.iter().map(|r| r.object_id).collect();
    assert_eq!(ids, fixture.eligible);

    let out = Document::load(&fixture.output).unwrap();
    assert_eq!(out.get_pages().len(), 7);

    for &id in &fixture.eligible {
        assert!(is_jbig2(&out, id), "object {id:?} not recompressed");
        let spliced = stream(&out, id);
        assert!(spliced.content.starts_with(b"P4\n16 4\n"));
        assert_eq!(spliced.dict.get(b"Width").unwrap().as_i64().unwrap(), 16);
        assert_eq!(spliced.dict.get(b"Height").unwrap().as_i64().unwrap(), 4);
    }
    for &id in &fixture.ineligible {
        assert!(!is_jbig2(&out, id));
    }

    // One dictionary per chunk, shared by its members
    let globals: Vec<_> = fixture.eligible.iter().map(|&id| globals_ref(&out, id)).collect();
    assert_eq!(globals[0], globals[1]);
    assert_eq!(globals[2], globals[3]);
    assert_ne!(globals[1], globals[2]);
    assert_ne!(globals[3], globals[4]);
    assert_eq!(globals.iter().collect::<BTreeSet<_>>().len(), 3);

    let last = stream(&out, globals[4]);
    let symbols = last
        .decompressed_content()
        .unwrap_or_else(|_| last.content.clone());
    assert_eq!(symbols, b"SYMBOLS chunk_2");
}

#[test]
fn test_records_carry_sizes() {
    let fixture = build_pdf(3, false);
    let outcome = Optimizer::new(test_settings(128), FakeEncoder::default())
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    let OptimizeOutcome::Optimized(summary) = outcome else {
        panic!("expected images to be optimized");
    };
    for record in &summary.records {
        assert_eq!(record.chunk_id, Some(0));
        assert_eq!(record.orig_size, 8);
        assert_eq!(record.fragment_size, Some(b"P4\n16 4\n".len() + 8));
        assert_eq!(record.globals_size, Some(b"SYMBOLS chunk_0".len()));
    }
    assert_eq!(summary.sizes.original, fs::metadata(&fixture.input).unwrap().len());
    assert_eq!(summary.sizes.optimized, fs::metadata(&fixture.output).unwrap().len());
}

#[test]
fn test_single_image_gets_its_own_dictionary() {
    let fixture = build_pdf(1, false);
    let encoder = FakeEncoder::default();
    let chunk_sizes = encoder.chunk_sizes.clone();

    let outcome = Optimizer::new(test_settings(128), encoder)
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    assert!(matches!(outcome, OptimizeOutcome::Optimized(ref s) if s.chunk_count == 1));
    assert_eq!(*chunk_sizes.borrow(), vec![1]);

    let out = Document::load(&fixture.output).unwrap();
    let globals = globals_ref(&out, fixture.eligible[0]);
    assert!(out.get_object(globals).unwrap().as_stream().is_ok());
}

#[test]
fn test_no_eligible_images_writes_nothing() {
    let fixture = build_pdf(0, true);
    let encoder = FakeEncoder::default();
    let chunk_sizes = encoder.chunk_sizes.clone();

    let outcome = Optimizer::new(test_settings(128), encoder)
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    assert!(matches!(outcome, OptimizeOutcome::NoEligibleImages));
    assert!(chunk_sizes.borrow().is_empty());
    assert!(!fixture.output.exists());
}

#[test]
fn test_rerun_on_optimized_output_finds_nothing() {
    let fixture = build_pdf(3, true);
    Optimizer::new(test_settings(2), FakeEncoder::default())
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    let second = fixture.output.with_file_name("scan.opt2.pdf");
    let outcome = Optimizer::new(test_settings(2), FakeEncoder::default())
        .optimize(&fixture.output, &second)
        .unwrap();

    assert!(matches!(outcome, OptimizeOutcome::NoEligibleImages));
    assert!(!second.exists());
}

#[test]
fn test_encoder_failure_aborts_without_output() {
    let fixture = build_pdf(3, false);
    let encoder = FakeEncoder {
        fail: true,
        ..Default::default()
    };

    let err = Optimizer::new(test_settings(128), encoder)
        .optimize(&fixture.input, &fixture.output)
        .unwrap_err();

    assert!(matches!(
        err,
        OptimizeError::Chunk {
            chunk: 0,
            source: EncodeError::MissingArtifact(_)
        }
    ));
    assert!(!fixture.output.exists());
}

#[test]
fn test_diagnostics_csv() {
    let fixture = build_pdf(5, false);
    let csv_path = fixture.output.with_file_name("diag.csv");
    let settings = Settings {
        diag_csv: Some(csv_path.clone()),
        ..test_settings(2)
    };

    Optimizer::new(settings, FakeEncoder::default())
        .optimize(&fixture.input, &fixture.output)
        .unwrap();

    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("chunk_id,pbm_path,orig_size,jb2_lsize,jb2_gsize"));

    let chunk_and_gsize: Vec<(String, String)> = lines[1..]
        .iter()
        .map(|line| {
            let fields: Vec<_> = line.split(',').collect();
            (fields[0].to_string(), fields[4].to_string())
        })
        .collect();
    let chunk_ids: Vec<_> = chunk_and_gsize.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(chunk_ids, vec!["0", "0", "1", "1", "2"]);
    assert_eq!(chunk_and_gsize[0].1, chunk_and_gsize[1].1);
    assert_eq!(chunk_and_gsize[2].1, chunk_and_gsize[3].1);
}

#[test]
fn test_invalid_threshold_fails_before_opening() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        threshold: 0.3,
        ..Default::default()
    };

    let err = optimize_pdf(
        &dir.path().join("missing.pdf"),
        &dir.path().join("out.pdf"),
        &settings,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        OptimizeError::Config(ConfigError::ThresholdOutOfRange { .. })
    ));
}

#[test]
fn test_unreadable_input_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("not-a.pdf");
    fs::write(&input, b"this is not a pdf").unwrap();

    let err = Optimizer::new(test_settings(128), FakeEncoder::default())
        .optimize(&input, &dir.path().join("out.pdf"))
        .unwrap_err();
    assert!(matches!(err, OptimizeError::Load(_)));
}
