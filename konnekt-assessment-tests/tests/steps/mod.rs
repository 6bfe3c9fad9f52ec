mod capture_steps;
mod dispatch_steps;
mod renderer_steps;
