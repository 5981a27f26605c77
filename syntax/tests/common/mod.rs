pub mod stubs;

use probescript_syntax::{
    execution::ExecutionContext, Compiler, DispatchStats, Engine, PinRegistry, Program,
    ProtocolDriver, SessionConfig, SimulatedBoard, Trace,
};

/// Compiles `line` with the default configuration, panicking on errors.
pub fn compile(line: &str) -> Program {
    let config = SessionConfig::default();
    let pins = PinRegistry::new(config.pin_count);
    Compiler::new(&config, &pins)
        .compile_str(line)
        .expect("test syntax should compile")
}

/// Compiles and runs `line` against `driver` on a fresh simulated board.
pub fn execute(line: &str, driver: &mut dyn ProtocolDriver) -> (Trace, DispatchStats) {
    let program = compile(line);
    let mut board = SimulatedBoard::new(8);
    let mut pins = PinRegistry::new(8);
    let mut engine = Engine::new(SessionConfig::default().capacity);
    let trace = {
        let mut ctx = ExecutionContext::new(driver, &mut board, &mut pins);
        engine.run(&program, &mut ctx)
    };
    (trace, engine.stats().clone())
}
