//! Wirelab demo session
//!
//! Wires a small experiment together without a UI: a range source feeds the
//! core's input, a second range provides the training targets, and the
//! trained model's predictions end up on a print sink. Run with
//! `RUST_LOG=debug` to watch payloads propagate.

use log::info;

use wirelab::modules::{CoreModule, PrintSink, RangeInput, TensorPack, TensorUnpack};
use wirelab::{
    EngineConfig, GraphEngine, IdentityModel, ModuleKind, Payload, Pos2, Tensor,
};

fn main() {
    env_logger::init();

    let config = EngineConfig::default();
    let fit = config.fit.clone();
    let mut engine = GraphEngine::with_config(config);

    let range = engine.add_module(|g| RangeInput::new(g, 1).into());
    let target = engine.add_module(|g| RangeInput::new(g, 1).into());
    let pack_x = engine.add_module(|g| TensorPack::new(g, 1).into());
    let pack_y = engine.add_module(|g| TensorPack::new(g, 1).into());
    let core = engine.add_module(|g| {
        CoreModule::new(g, Box::new(IdentityModel::new(vec![1], 1))).with_fit_options(fit).into()
    });
    let unpack = engine.add_module(|g| TensorUnpack::new(g, 1).into());
    let print = engine.add_module(|g| PrintSink::new(g).into());

    engine.move_module(range, Pos2::new(0.0, -600.0));
    engine.move_module(target, Pos2::new(0.0, -400.0));
    engine.move_module(pack_x, Pos2::new(500.0, -600.0));
    engine.move_module(pack_y, Pos2::new(500.0, -400.0));
    engine.move_module(core, Pos2::new(900.0, -500.0));
    engine.move_module(unpack, Pos2::new(1200.0, -500.0));
    engine.move_module(print, Pos2::new(1500.0, -500.0));

    let range_out = match engine.module(range) {
        Some(ModuleKind::Range(m)) => m.outputs[0],
        _ => unreachable!(),
    };
    let target_out = match engine.module(target) {
        Some(ModuleKind::Range(m)) => m.outputs[0],
        _ => unreachable!(),
    };
    let (pack_x_in, pack_x_out) = match engine.module(pack_x) {
        Some(ModuleKind::Pack(m)) => (m.inputs[0], m.output),
        _ => unreachable!(),
    };
    let (pack_y_in, pack_y_out) = match engine.module(pack_y) {
        Some(ModuleKind::Pack(m)) => (m.inputs[0], m.output),
        _ => unreachable!(),
    };
    let (core_in, core_out) = match engine.module(core) {
        Some(ModuleKind::Core(m)) => (m.input, m.output),
        _ => unreachable!(),
    };
    let (unpack_in, unpack_out) = match engine.module(unpack) {
        Some(ModuleKind::Unpack(m)) => (m.input, m.outputs[0]),
        _ => unreachable!(),
    };
    let print_in = match engine.module(print) {
        Some(ModuleKind::Print(m)) => m.input,
        _ => unreachable!(),
    };

    engine.graph.connect(range_out, pack_x_in);
    engine.graph.connect(pack_x_out, core_in);
    engine.graph.connect(target_out, pack_y_in);
    engine.graph.connect(pack_y_out, core_out);
    engine.graph.update();
    info!("wired {} ports, {} wires", engine.graph.len(), engine.graph.wires().len());

    // collect training samples
    if let Some(ModuleKind::Core(core)) = engine.module_mut(core) {
        core.set_train_mode(true);
    }
    engine.pass(range);
    engine.pass(target);

    if let Some(ModuleKind::Core(core_module)) = engine.module_mut(core) {
        let (xs, ys) = core_module.sample_counts();
        info!("collected {} inputs and {} targets", xs, ys);
        match core_module.start_training() {
            Ok(report) => info!("trained for {} epochs", report.epochs_run),
            Err(err) => {
                eprintln!("training failed: {}", err);
                return;
            }
        }
        core_module.set_train_mode(false);
    }

    // rewire the core output into the sink chain and run one prediction
    engine.graph.connect(core_out, unpack_in);
    engine.graph.connect(unpack_out, print_in);
    engine.graph.update();

    engine.push(core_in, Payload::Tensors(vec![Tensor::from_vec(vec![42.0])]));
    if let Some(ModuleKind::Print(print)) = engine.module(print) {
        println!("prediction for 42: {}", print.display());
    }
}
