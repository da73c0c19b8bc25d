mod combat_flow;
mod state_transitions;
