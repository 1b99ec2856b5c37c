mod default_sampler;
mod sampler;
