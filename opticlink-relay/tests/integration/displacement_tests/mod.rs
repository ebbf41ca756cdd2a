mod test_second_producer_displaces_first;
