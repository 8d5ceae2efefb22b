use core::fmt::Write;

use serial_core::{Args, Context};

pub fn help(ctx: &mut Context<'_, '_>, _: &Args<'_>) {
    let _ = ctx.list_all_commands();
}

pub fn led(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    if args.int(0) == Some(1) {
        let _ = writeln!(ctx, "led | ON");
    } else {
        let _ = writeln!(ctx, "led | OFF");
    }
}

pub fn gain(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let _ = writeln!(ctx, "gain | {} dB", args.get(0));
}

pub fn name(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let _ = writeln!(ctx, "name | [{}]", args.get(0));
}

// The motor id is collected by the `motor` group and arrives first.
pub fn motor_speed(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let _ = writeln!(ctx, "motor {} | speed: {} rpm", args.get(0), args.get(1));
}

pub fn motor_stop(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let _ = writeln!(ctx, "motor {} | stopped", args.get(0));
}

pub fn greet(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let _ = writeln!(ctx, "Hello, {}!", args.get(0));
}

/// Prints the usage line of the command being run, with its argument values.
pub fn whoami(ctx: &mut Context<'_, '_>, args: &Args<'_>) {
    let cmd = ctx.command();
    let _ = write!(ctx, "{}", cmd.signature());
    for value in args.iter() {
        let _ = write!(ctx, " | {}", value);
    }
    let _ = writeln!(ctx);
}
