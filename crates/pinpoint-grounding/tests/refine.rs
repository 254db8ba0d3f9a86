use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use pinpoint_grounding::{
    GroundingError, PlotVisualizer, RawDetection, RefineConfig, RefinePipeline, ReplayModel,
};
use pinpoint_image::Image;
use pinpoint_io::functional::{read_image_any_rgb8, write_image_any_rgb8};

fn raw(center: [f64; 2], size: [f64; 2], confidence: f64, phrase: &str) -> RawDetection {
    RawDetection {
        center,
        size,
        confidence,
        phrase: phrase.to_string(),
    }
}

fn write_scene(dir: &Path) -> Result<PathBuf, GroundingError> {
    let path = dir.join("scene.png");
    let data = (0..200 * 100)
        .flat_map(|i| [(i % 200) as u8, (i / 200) as u8, 0])
        .collect::<Vec<_>>();
    write_image_any_rgb8(&path, &Image::<u8, 3>::new([200, 100].into(), data)?)?;
    Ok(path)
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, GroundingError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix));
        if matches {
            files.push(path);
        }
    }
    Ok(files)
}

fn config(output_dir: &Path) -> RefineConfig {
    RefineConfig {
        first_threshold: 0.2,
        second_threshold: 0.25,
        output_dir: output_dir.to_path_buf(),
        draw_raw: true,
    }
}

fn coarse_pass() -> Vec<RawDetection> {
    vec![
        // (50, 50) 20x20 px
        raw([0.25, 0.5], [0.1, 0.2], 0.5, "microwave"),
        // (120, 30) 20x20 px
        raw([0.6, 0.3], [0.1, 0.2], 0.6, "microwave"),
    ]
}

fn refined_pass() -> Vec<RawDetection> {
    vec![
        // (45, 20) 72x32 px on the 90x40 crop, encloses the button center
        raw([0.5, 0.5], [0.8, 0.8], 0.4, "microwave"),
        // (54, 20) 9x8 px on the 90x40 crop
        raw([0.6, 0.5], [0.1, 0.2], 0.3, "button"),
    ]
}

#[test]
fn refine_locates_the_inner_box() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    let refinement = pipeline
        .locate(&scene, "microwave button")?
        .ok_or(GroundingError::InvariantViolation("expected a refinement"))?;

    assert_eq!(pipeline.model().remaining(), 0);
    assert_eq!(refinement.best.phrase, "button");

    assert_relative_eq!(refinement.region.x_min, 40.0);
    assert_relative_eq!(refinement.region.y_min, 20.0);
    assert_relative_eq!(refinement.region.x_max, 130.0);
    assert_relative_eq!(refinement.region.y_max, 60.0);

    assert_relative_eq!(refinement.region_top_left.x, 40.0);
    assert_relative_eq!(refinement.region_top_left.y, 20.0);
    assert_relative_eq!(refinement.center.x, 54.0, epsilon = 1e-9);
    assert_relative_eq!(refinement.center.y, 20.0, epsilon = 1e-9);

    let in_source = refinement.center_in_source();
    assert_relative_eq!(in_source.x, 94.0, epsilon = 1e-9);
    assert_relative_eq!(in_source.y, 40.0, epsilon = 1e-9);

    let cropped = read_image_any_rgb8(&refinement.cropped_image_path)?;
    assert_eq!(cropped.width(), 90);
    assert_eq!(cropped.height(), 40);
    assert!(scene.exists());
    Ok(())
}

#[test]
fn empty_first_pass_returns_none_without_cropping() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    // the only box is below the first threshold
    let model = ReplayModel::new(vec![
        vec![raw([0.5, 0.5], [0.1, 0.1], 0.1, "cup")],
        refined_pass(),
    ]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    assert!(pipeline.locate(&scene, "cup")?.is_none());
    assert_eq!(pipeline.model().remaining(), 1);
    assert!(files_with_prefix(tmp_dir.path(), "cropped_image")?.is_empty());
    Ok(())
}

#[test]
fn empty_second_pass_returns_none() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    let model = ReplayModel::new(vec![coarse_pass(), vec![]]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    assert!(pipeline.locate(&scene, "microwave")?.is_none());
    assert_eq!(files_with_prefix(tmp_dir.path(), "cropped_image")?.len(), 1);
    Ok(())
}

#[test]
fn thresholds_are_independent_per_pass() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    // a second threshold above both refined confidences discards them
    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));
    assert!(pipeline.refine(&scene, "button", 0.2, 0.45)?.is_none());

    // a lower second threshold keeps the button
    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));
    let refinement = pipeline.refine(&scene, "button", 0.2, 0.1)?;
    assert_eq!(
        refinement.map(|r| r.best.phrase),
        Some("button".to_string())
    );
    Ok(())
}

#[test]
fn missing_image_is_a_detection_failure() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let model = ReplayModel::new(vec![coarse_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    let err = match pipeline.locate(tmp_dir.path().join("missing.png"), "cup") {
        Err(err) => err,
        Ok(_) => return Err(GroundingError::InvariantViolation("expected an error")),
    };

    assert!(matches!(err, GroundingError::DetectionFailure { .. }));
    let source = std::error::Error::source(&err)
        .and_then(|s| s.downcast_ref::<GroundingError>());
    assert!(matches!(source, Some(GroundingError::NotFound(_))));

    // the model is never invoked for a missing file
    assert_eq!(pipeline.model().remaining(), 1);
    Ok(())
}

#[test]
fn model_errors_are_wrapped_with_the_stage() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    // only one pass recorded, the second pass exhausts the model
    let model = ReplayModel::new(vec![coarse_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    match pipeline.locate(&scene, "microwave") {
        Err(GroundingError::DetectionFailure { context, .. }) => {
            assert_eq!(context, "second detection pass");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn plots_are_written_when_requested() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;
    let plots = tmp_dir.path().join("plots");
    std::fs::create_dir_all(&plots)?;

    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline =
        RefinePipeline::new(model, config(tmp_dir.path())).with_visualizer(PlotVisualizer::new(&plots));
    assert!(pipeline.locate(&scene, "button")?.is_some());

    // one raw plot per pass and one selection plot
    assert_eq!(files_with_prefix(&plots, "detection_result")?.len(), 3);

    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let no_raw = RefineConfig {
        draw_raw: false,
        ..config(tmp_dir.path())
    };
    let pipeline = RefinePipeline::new(model, no_raw).with_visualizer(PlotVisualizer::new(&plots));
    assert!(pipeline.locate(&scene, "button")?.is_some());
    assert_eq!(files_with_prefix(&plots, "detection_result")?.len(), 4);
    Ok(())
}

#[test]
fn failing_visualizer_does_not_change_the_result() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()))
        .with_visualizer(PlotVisualizer::new(tmp_dir.path().join("does-not-exist")));

    let refinement = pipeline.locate(&scene, "button")?;
    assert_eq!(
        refinement.map(|r| r.best.phrase),
        Some("button".to_string())
    );
    Ok(())
}

#[test]
fn detect_best_runs_a_single_pass() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    let model = ReplayModel::new(vec![coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    let best = pipeline
        .detect_best(&scene, "microwave", 0.2)?
        .ok_or(GroundingError::InvariantViolation("expected a box"))?;
    assert_eq!(best.confidence, 0.6);
    assert_relative_eq!(best.scaled.center.x, 120.0, epsilon = 1e-9);
    assert_eq!(pipeline.model().remaining(), 1);
    assert!(files_with_prefix(tmp_dir.path(), "cropped_image")?.is_empty());
    Ok(())
}

#[test]
fn warm_up_consumes_one_detection() -> Result<(), GroundingError> {
    let tmp_dir = tempfile::tempdir()?;
    let scene = write_scene(tmp_dir.path())?;

    let model = ReplayModel::new(vec![vec![], coarse_pass(), refined_pass()]);
    let pipeline = RefinePipeline::new(model, config(tmp_dir.path()));

    pipeline.warm_up(&scene)?;
    assert_eq!(pipeline.model().remaining(), 2);
    assert!(pipeline.locate(&scene, "button")?.is_some());
    Ok(())
}

#[test]
fn pipeline_can_be_shared_between_threads() {
    fn assert_sync<T: Sync + Send>() {}
    assert_sync::<RefinePipeline<ReplayModel, PlotVisualizer>>();
}
